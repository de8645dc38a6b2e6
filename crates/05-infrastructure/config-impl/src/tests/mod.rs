mod layered_config_tests;
