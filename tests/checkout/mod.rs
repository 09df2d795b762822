mod checkout_commit_successfully;
mod checkout_keeps_staged_work;
mod checkout_with_conflicts;
