mod list_all_blobs_from_head_commit;
mod list_root_tree_and_subtree;
