mod remove_files_from_index_and_workspace;
