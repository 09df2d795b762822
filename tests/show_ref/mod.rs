mod list_references;
