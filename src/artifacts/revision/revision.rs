use crate::areas::database::{Database, MIN_PREFIX_LENGTH};
use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::ref_name::RefName;
use crate::artifacts::revision::{ANCESTOR_REGEX, PARENT_REGEX, PEEL_REGEX, REF_ALIASES};
use crate::errors::GotError;
use anyhow::Context;

/// What `<rev>^{...}` peels an object to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeelTarget {
    /// `^{}`: unwrap annotated tags until something else is reached
    Untagged,
    /// `^{object}`: the object itself, whatever its kind
    Any,
    Kind(ObjectType),
}

impl TryFrom<&str> for PeelTarget {
    type Error = anyhow::Error;

    fn try_from(kind: &str) -> Result<Self, Self::Error> {
        match kind {
            "" => Ok(PeelTarget::Untagged),
            "object" => Ok(PeelTarget::Any),
            kind => Ok(PeelTarget::Kind(ObjectType::try_from(kind)?)),
        }
    }
}

/// A parsed revision expression
///
/// Supported forms:
/// - Reference names: `HEAD`, `master`, `v1.0`, `refs/heads/topic`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Abbreviated or full object ids (at least 4 hex characters), tried when no
///   reference by that name exists
/// - Parent: `<rev>^`
/// - Ancestor: `<rev>~<n>` (`<rev>~` is `<rev>~1`)
/// - Peel: `<rev>^{}`, `<rev>^{object}`, `<rev>^{tree}`, ...
///
/// Suffixes apply left to right, so `HEAD~2^{tree}` is the tree of the grandparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// A reference name or an object id prefix
    Ref(String),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
    Peel(Box<Revision>, PeelTarget),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let invalid = || GotError::InvalidRevisionSyntax {
            spec: revision.to_string(),
        };

        let peel_regex = regex::Regex::new(PEEL_REGEX)
            .with_context(|| format!("invalid peel regex: {PEEL_REGEX}"))?;
        if let Some(caps) = peel_regex.captures(revision) {
            let target = PeelTarget::try_from(&caps[2]).map_err(|_| invalid())?;
            return Ok(Revision::Peel(Box::new(Self::try_parse(&caps[1])?), target));
        }

        let parent_regex = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        if let Some(caps) = parent_regex.captures(revision) {
            return Ok(Revision::Parent(Box::new(Self::try_parse(&caps[1])?)));
        }

        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;
        if let Some(caps) = ancestor_regex.captures(revision) {
            let generations = match &caps[2] {
                "" => 1,
                count => count.parse().map_err(|_| invalid())?,
            };
            return Ok(Revision::Ancestor(
                Box::new(Self::try_parse(&caps[1])?),
                generations,
            ));
        }

        let name = *REF_ALIASES.get(revision).unwrap_or(&revision);
        if RefName::candidates(name).is_empty() && !looks_like_oid(name) {
            return Err(invalid().into());
        }

        Ok(Revision::Ref(name.to_string()))
    }

    /// Resolve to an object id without modifying the repository
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => Self::resolve_name(name, repository),
            Revision::Parent(base) => {
                let oid = base.resolve(repository)?;
                first_parent(repository.database(), &oid)
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(repository)?;
                for _ in 0..*generations {
                    oid = first_parent(repository.database(), &oid)?;
                }

                Ok(oid)
            }
            Revision::Peel(base, target) => {
                let oid = base.resolve(repository)?;
                peel(repository.database(), &oid, *target)
            }
        }
    }

    /// The reference this revision names directly, if it is a plain reference name
    pub fn ref_name(&self, repository: &Repository) -> Option<RefName> {
        match self {
            Revision::Ref(name) => repository.refs().lookup(name),
            _ => None,
        }
    }

    fn resolve_name(name: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if let Some(ref_name) = repository.refs().lookup(name) {
            let oid = repository.refs().read(&ref_name)?;
            if !repository.database().exists(&oid) {
                return Err(GotError::DanglingReference {
                    name: ref_name.to_string(),
                    oid: oid.to_string(),
                }
                .into());
            }

            return Ok(oid);
        }

        if looks_like_oid(name) {
            return repository.database().resolve_prefix(name);
        }

        Err(GotError::ReferenceNotFound {
            name: name.to_string(),
        }
        .into())
    }
}

/// Follow annotated tags (and commits, for `^{tree}`) until `target` is reached
pub fn peel(database: &Database, oid: &ObjectId, target: PeelTarget) -> anyhow::Result<ObjectId> {
    let mut current = oid.clone();

    loop {
        let kind = database.object_type(&current)?;
        let reached = match target {
            PeelTarget::Any => true,
            PeelTarget::Untagged => kind != ObjectType::Tag,
            PeelTarget::Kind(wanted) => kind == wanted,
        };
        if reached {
            return Ok(current);
        }

        current = match (kind, target) {
            (ObjectType::Tag, _) => database
                .get(&current)?
                .into_tag()
                .map(|tag| tag.target().clone())
                .ok_or_else(|| GotError::malformed(&current, "expected a tag"))?,
            (ObjectType::Commit, PeelTarget::Kind(ObjectType::Tree)) => {
                database.get_commit(&current)?.tree_oid().clone()
            }
            _ => {
                return Err(GotError::WrongKind {
                    oid: oid.to_string(),
                    wanted: match target {
                        PeelTarget::Kind(wanted) => wanted.to_string(),
                        _ => "non-tag object".to_string(),
                    },
                }
                .into());
            }
        };
    }
}

/// First parent of the commit `oid` peels to
fn first_parent(database: &Database, oid: &ObjectId) -> anyhow::Result<ObjectId> {
    let commit_oid = peel(database, oid, PeelTarget::Untagged)?;
    let kind = database.object_type(&commit_oid)?;
    if kind != ObjectType::Commit {
        return Err(GotError::NotACommit {
            oid: commit_oid.to_string(),
            kind: kind.to_string(),
        }
        .into());
    }

    database
        .get_commit(&commit_oid)?
        .parent()
        .cloned()
        .ok_or_else(|| {
            GotError::NoParent {
                oid: commit_oid.to_string(),
            }
            .into()
        })
}

fn looks_like_oid(name: &str) -> bool {
    (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_hexdigit())
}
