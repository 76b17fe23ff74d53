mod enhancement_kind_test;
