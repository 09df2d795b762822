mod print_nothing_when_no_files_are_changed;
