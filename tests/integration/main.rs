mod feed_run_tests;
