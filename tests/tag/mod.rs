mod create_and_list_tags;
