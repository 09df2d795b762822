mod resolve_revision_expressions;
mod resolve_revision_errors;
