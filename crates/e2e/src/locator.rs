//! Element locators
//!
//! A [`Locator`] is a lazy description of how to find an element: a chain of
//! lookups, each scoped to the result of the previous one, optionally
//! narrowed to the n-th match. Nothing is resolved until a [`Driver`] acts on
//! it, which is what lets page objects build every locator up front.
//!
//! [`Driver`]: crate::driver::Driver

use std::fmt;

use serde::{Deserialize, Serialize};

/// ARIA roles used by the Fortymm page objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    Alert,
    Button,
    Heading,
    Img,
    Link,
    Textbox,
}

impl AriaRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaRole::Alert => "alert",
            AriaRole::Button => "button",
            AriaRole::Heading => "heading",
            AriaRole::Img => "img",
            AriaRole::Link => "link",
            AriaRole::Textbox => "textbox",
        }
    }
}

/// A single lookup step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// CSS selector
    Css { selector: String },

    /// Accessible role with optional accessible name / heading level
    Role {
        role: AriaRole,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
        #[serde(default)]
        exact: bool,
    },

    /// Form control by its label text
    Label { text: String },

    /// Element by its text content
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    chain: Vec<Selector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nth: Option<usize>,
}

impl Locator {
    fn root(selector: Selector) -> Self {
        Self {
            chain: vec![selector],
            nth: None,
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::root(Selector::Css {
            selector: selector.into(),
        })
    }

    /// Element with `role` and no name constraint
    pub fn role(role: AriaRole) -> Self {
        Self::root(Selector::Role {
            role,
            name: None,
            level: None,
            exact: false,
        })
    }

    /// Element with `role` whose accessible name contains `name`
    pub fn role_named(role: AriaRole, name: impl Into<String>) -> Self {
        Self::root(Selector::Role {
            role,
            name: Some(name.into()),
            level: None,
            exact: false,
        })
    }

    pub fn heading_level(level: u8) -> Self {
        Self::root(Selector::Role {
            role: AriaRole::Heading,
            name: None,
            level: Some(level),
            exact: false,
        })
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::root(Selector::Label { text: text.into() })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::root(Selector::Text { text: text.into() })
    }

    /// Scope `inner` to matches of `self`
    pub fn within(&self, inner: Locator) -> Self {
        let mut chain = self.chain.clone();
        chain.extend(inner.chain);
        Self {
            chain,
            nth: inner.nth,
        }
    }

    /// The `index`-th (zero-based) match of this locator
    pub fn nth(&self, index: usize) -> Self {
        Self {
            chain: self.chain.clone(),
            nth: Some(index),
        }
    }

    pub fn chain(&self) -> &[Selector] {
        &self.chain
    }

    pub fn index(&self) -> Option<usize> {
        self.nth
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css { selector } => write!(f, "css={selector}"),
            Selector::Role {
                role, name, level, ..
            } => {
                write!(f, "role={}", role.as_str())?;
                if let Some(name) = name {
                    write!(f, "[name=\"{name}\"]")?;
                }
                if let Some(level) = level {
                    write!(f, "[level={level}]")?;
                }
                Ok(())
            }
            Selector::Label { text } => write!(f, "label=\"{text}\""),
            Selector::Text { text } => write!(f, "text=\"{text}\""),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.chain.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            write!(f, "{selector}")?;
        }
        if let Some(nth) = self.nth {
            write!(f, " >> nth={nth}")?;
        }
        Ok(())
    }
}
