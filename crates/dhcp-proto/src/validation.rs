//! Option presence rules checked against a packet before it is sent.

use crate::error::ValidationError;
use crate::{OptionMap, Tag};
use std::fmt;

/// One rule over the options of a packet
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// The option must be present
    Must(Tag),

    /// The option must be absent
    MustNot(Tag),

    /// Only these options may be present
    AllowedSet(&'static [Tag]),
}

impl Validation {
    pub fn check(&self, options: &OptionMap) -> Result<(), ValidationError> {
        match *self {
            Validation::Must(tag) if !options.contains(tag) => {
                Err(ValidationError::MustHave(tag))
            }
            Validation::MustNot(tag) if options.contains(tag) => {
                Err(ValidationError::MustNotHave(tag))
            }
            Validation::AllowedSet(allowed) => match options.tags().find(|t| !allowed.contains(t)) {
                Some(tag) => Err(ValidationError::MustNotHave(tag)),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Must(tag) => write!(f, "Must({tag})"),
            Validation::MustNot(tag) => write!(f, "MustNot({tag})"),
            Validation::AllowedSet(tags) => f.debug_tuple("AllowedSet").field(tags).finish(),
        }
    }
}

/// Run `rules` in order and return the first failure
pub fn validate<'a, I>(options: &OptionMap, rules: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a Validation>,
{
    rules.into_iter().try_for_each(|rule| rule.check(options))
}
