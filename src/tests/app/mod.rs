mod text_sync_tests;
