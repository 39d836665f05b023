//! Operator catalog: groups, categories and tokens in declaration order.
//!
//! A category's bit is its zero-based position within its group, so bit
//! assignment depends only on the order the catalog was declared in. The
//! catalog is immutable once built; sanitizers borrow it.
//!
//! # Example
//!
//! ```
//! use opstrip::Catalog;
//!
//! let catalog = Catalog::mongodb();
//! assert_eq!(catalog.bit_of("query", "logical").unwrap(), 1 << 1);
//! assert!(catalog.tokens_of("query", "element").unwrap().contains(&"$exists".to_string()));
//! ```

pub mod bits;
mod mongodb;

use crate::constants::{MAX_CATEGORIES, OPERATOR_PREFIX};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::sync::OnceLock;

static MONGODB: OnceLock<Catalog> = OnceLock::new();

/// A named category of operators within a group. Maps to one bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDef {
    name: String,
    tokens: Vec<String>,
}

impl CategoryDef {
    /// Create a category. The name is stored lowercase.
    pub fn new<S: AsRef<str>>(name: &str, tokens: &[S]) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    /// Category name (lowercase).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operator tokens in declaration order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// A named operator group (query context) with its ordered categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDef {
    name: String,
    categories: Vec<CategoryDef>,
}

impl GroupDef {
    /// Create a group from ordered categories. The name is stored lowercase.
    pub fn new(name: &str, categories: Vec<CategoryDef>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            categories,
        }
    }

    /// Create a flat group: one implicit category named after the group.
    pub fn flat<S: AsRef<str>>(name: &str, tokens: &[S]) -> Self {
        Self::new(name, vec![CategoryDef::new(name, tokens)])
    }

    /// Group name (lowercase).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Categories in declaration (bit) order.
    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    /// Look up a category by name, ignoring ASCII case.
    pub fn category(&self, name: &str) -> Option<(usize, &CategoryDef)> {
        self.categories
            .iter()
            .enumerate()
            .find(|(_, c)| c.name.eq_ignore_ascii_case(name))
    }

    /// Mask with every category bit set: `(1 << count) - 1`.
    ///
    /// Saturates at `u64::MAX` for 64 or more categories.
    pub fn all(&self) -> u64 {
        u32::try_from(self.categories.len())
            .ok()
            .and_then(|n| 1u64.checked_shl(n))
            .map_or(u64::MAX, |bit| bit - 1)
    }

    /// All tokens of the group in category order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.tokens.iter().map(String::as_str))
    }
}

/// Immutable registry of operator groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    prefix: char,
    groups: Vec<GroupDef>,
}

impl Catalog {
    /// Build and validate a custom catalog.
    ///
    /// Rejects: no groups, empty or duplicate group names, groups without
    /// categories or with more than 64 of them, duplicate category names,
    /// tokens that do not start with `prefix`, and tokens repeated within
    /// a group.
    pub fn new(prefix: char, groups: Vec<GroupDef>) -> Result<Self> {
        validate(prefix, &groups)?;
        Ok(Self { prefix, groups })
    }

    /// The built-in MongoDB catalog, built on first use.
    pub fn mongodb() -> &'static Self {
        MONGODB.get_or_init(|| Self {
            prefix: OPERATOR_PREFIX,
            groups: mongodb::GROUPS
                .iter()
                .map(|(name, table)| {
                    let categories = table
                        .iter()
                        .map(|(category, tokens)| CategoryDef::new(category, *tokens))
                        .collect();
                    GroupDef::new(name, categories)
                })
                .collect(),
        })
    }

    /// Operator prefix marker (`$` for MongoDB).
    pub const fn prefix(&self) -> char {
        self.prefix
    }

    /// Group definitions in declaration order.
    pub fn groups(&self) -> &[GroupDef] {
        &self.groups
    }

    /// Group names in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(GroupDef::name)
    }

    /// Look up a group, ignoring ASCII case.
    pub fn group(&self, name: &str) -> Option<&GroupDef> {
        self.groups.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    fn require(&self, group: &str) -> Result<&GroupDef> {
        self.group(group)
            .ok_or_else(|| Error::UnknownGroup(group.to_string()))
    }

    /// Category names of `group` in bit order.
    pub fn categories_of(&self, group: &str) -> Result<Vec<&str>> {
        Ok(self
            .require(group)?
            .categories
            .iter()
            .map(CategoryDef::name)
            .collect())
    }

    /// Tokens of one category in declaration order.
    pub fn tokens_of(&self, group: &str, category: &str) -> Result<&[String]> {
        let def = self.require(group)?;
        def.category(category)
            .map(|(_, c)| c.tokens())
            .ok_or_else(|| Error::UnknownCategory {
                group: def.name.clone(),
                category: category.to_string(),
            })
    }

    /// Bit mask of one category: `1 << position`.
    pub fn bit_of(&self, group: &str, category: &str) -> Result<u64> {
        let def = self.require(group)?;
        def.category(category)
            .map(|(index, _)| 1u64 << index)
            .ok_or_else(|| Error::UnknownCategory {
                group: def.name.clone(),
                category: category.to_string(),
            })
    }

    /// Mask enabling every category of `group`.
    pub fn all_of(&self, group: &str) -> Result<u64> {
        Ok(self.require(group)?.all())
    }

    /// Whether `key` carries this catalog's operator prefix.
    pub fn is_operator(&self, key: &str) -> bool {
        crate::sanitize::is_operator_token(self.prefix, key)
    }
}

fn validate(prefix: char, groups: &[GroupDef]) -> Result<()> {
    if groups.is_empty() {
        return Err(Error::invalid("catalog must declare at least one group"));
    }

    let mut group_names = HashSet::new();
    for group in groups {
        if group.name.is_empty() {
            return Err(Error::invalid("group name cannot be empty"));
        }
        if !group_names.insert(group.name.as_str()) {
            return Err(Error::invalid(format!("duplicate group `{}`", group.name)));
        }
        if group.categories.is_empty() || group.categories.len() > MAX_CATEGORIES {
            return Err(Error::invalid(format!(
                "group `{}` must have between 1 and {MAX_CATEGORIES} categories",
                group.name
            )));
        }

        let mut category_names = HashSet::new();
        let mut tokens = HashSet::new();
        for category in &group.categories {
            if !category_names.insert(category.name.as_str()) {
                return Err(Error::invalid(format!(
                    "duplicate category `{}` in group `{}`",
                    category.name, group.name
                )));
            }
            for token in &category.tokens {
                if !token.starts_with(prefix) {
                    return Err(Error::invalid(format!(
                        "token `{token}` in group `{}` lacks prefix `{prefix}`",
                        group.name
                    )));
                }
                if !tokens.insert(token.as_str()) {
                    return Err(Error::invalid(format!(
                        "token `{token}` declared twice in group `{}`",
                        group.name
                    )));
                }
            }
        }
    }

    Ok(())
}
