mod update_tests;
