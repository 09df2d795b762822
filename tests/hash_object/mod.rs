mod read_objects_with_cat_file;
