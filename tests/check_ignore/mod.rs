mod report_ignored_paths;
