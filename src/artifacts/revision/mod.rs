//! Reference names and revision expressions
//!
//! - `ref_name`: validated reference names (`HEAD`, `refs/heads/master`, ...)
//! - `revision`: parsing and resolving expressions such as `HEAD~2` or `v1^{tree}`

pub mod ref_name;
pub mod revision;

/// Characters and sequences a reference name component may not contain
pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|\/\/|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const PARENT_REGEX: &str = r"^(.+)\^$";
pub const ANCESTOR_REGEX: &str = r"^(.+)~(\d*)$";
pub const PEEL_REGEX: &str = r"^(.+)\^\{([a-z]*)\}$";
pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};
