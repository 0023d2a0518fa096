// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Palette construction and code-point lookup.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use smallvec::smallvec;

use crate::groups::{GroupDefinition, default_display_substitutions, default_groups};
use crate::template::{Template, TemplateId, TemplatePath};

/// Error raised while building a [`Palette`].
///
/// Palette construction failures are configuration mistakes, not runtime
/// data errors; callers are expected to surface them and stop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteError {
    /// Two groups claimed the same code point.
    DuplicateCodePoint {
        /// The code point claimed twice.
        code_point: char,
        /// The name of the second claiming group, if it had one.
        group: Option<&'static str>,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCodePoint { code_point, group } => match group {
                Some(name) => write!(
                    f,
                    "code point {code_point:?} is already in the palette; \
                     group {name:?} cannot claim it again"
                ),
                None => write!(
                    f,
                    "code point {code_point:?} is already in the palette; \
                     an unnamed group cannot claim it again"
                ),
            },
        }
    }
}

impl core::error::Error for PaletteError {}

/// An immutable symbol alphabet and its template tree.
///
/// Built once per session configuration via [`Palette::build`] (or
/// [`Palette::latin`] for the stock alphabet) and then shared by reference.
/// See the crate docs for the overall model.
#[derive(Clone, Debug)]
pub struct Palette {
    templates: Vec<Template>,
    root: TemplateId,
    code_points: Vec<char>,
    display: HashMap<char, char>,
    paths: HashMap<char, TemplatePath>,
}

impl Palette {
    /// Builds a palette from group definitions, with the stock display
    /// substitutions for whitespace.
    ///
    /// ## Errors
    ///
    /// - [`PaletteError::DuplicateCodePoint`] if two groups claim the same
    ///   code point.
    pub fn build(groups: &[GroupDefinition]) -> Result<Self, PaletteError> {
        Self::build_with_display(groups, default_display_substitutions())
    }

    /// Builds a palette with an explicit display-substitution table.
    ///
    /// Each `(symbol, shown)` pair renders `symbol` as `shown`; symbols not
    /// listed render as themselves.
    ///
    /// ## Errors
    ///
    /// - [`PaletteError::DuplicateCodePoint`] if two groups claim the same
    ///   code point.
    pub fn build_with_display(
        groups: &[GroupDefinition],
        substitutions: &[(char, char)],
    ) -> Result<Self, PaletteError> {
        let display: HashMap<char, char> = substitutions.iter().copied().collect();

        let mut templates = Vec::new();
        // Root placeholder; children are filled in as groups are laid down.
        templates.push(Template {
            symbol: None,
            display_text: None,
            style_class: None,
            children: Vec::new(),
        });
        let root = TemplateId(0);

        let mut code_points = Vec::new();
        let mut paths: HashMap<char, TemplatePath> = HashMap::new();

        for definition in groups {
            let parent = match definition.name {
                Some(name) => {
                    let group = Self::push_template(
                        &mut templates,
                        Template {
                            symbol: None,
                            display_text: None,
                            style_class: Some(name),
                            children: Vec::new(),
                        },
                    );
                    let root_index = templates[root.idx()].children.len();
                    templates[root.idx()].children.push(group);
                    (group, Some(root_index as u32))
                }
                None => (root, None),
            };

            for code_point in definition.members.iter() {
                let shown = display.get(&code_point).copied().unwrap_or(code_point);
                let leaf = Self::push_template(
                    &mut templates,
                    Template {
                        symbol: Some(code_point),
                        display_text: Some(shown),
                        style_class: None,
                        children: Vec::new(),
                    },
                );
                let (parent_id, group_index) = parent;
                let leaf_index = templates[parent_id.idx()].children.len() as u32;
                templates[parent_id.idx()].children.push(leaf);

                let path: TemplatePath = match group_index {
                    Some(gi) => smallvec![gi, leaf_index],
                    None => smallvec![leaf_index],
                };
                if paths.insert(code_point, path).is_some() {
                    return Err(PaletteError::DuplicateCodePoint {
                        code_point,
                        group: definition.name,
                    });
                }
                code_points.push(code_point);
            }
        }

        Ok(Self {
            templates,
            root,
            code_points,
            display,
            paths,
        })
    }

    /// The stock Latin palette; see [`default_groups`].
    #[must_use]
    pub fn latin() -> Self {
        Self::build(default_groups()).expect("stock groups are disjoint")
    }

    fn push_template(templates: &mut Vec<Template>, template: Template) -> TemplateId {
        let id = TemplateId(templates.len() as u32);
        templates.push(template);
        id
    }

    /// The root template ("no symbols yet").
    #[must_use]
    pub fn root(&self) -> TemplateId {
        self.root
    }

    /// Resolves a template id.
    ///
    /// ## Panics
    ///
    /// Panics if `id` did not come from this palette.
    #[must_use]
    pub fn template(&self, id: TemplateId) -> &Template {
        &self.templates[id.idx()]
    }

    /// Every code point in the palette, in palette order.
    #[must_use]
    pub fn code_points(&self) -> &[char] {
        &self.code_points
    }

    /// Whether `code_point` belongs to this palette.
    #[must_use]
    pub fn contains(&self, code_point: char) -> bool {
        self.paths.contains_key(&code_point)
    }

    /// The child-index path from the root to the leaf for `code_point`, or
    /// `None` if the code point is not in the palette.
    #[must_use]
    pub fn path(&self, code_point: char) -> Option<&TemplatePath> {
        self.paths.get(&code_point)
    }

    /// The character to render for `code_point`, after substitution.
    #[must_use]
    pub fn display_text(&self, code_point: char) -> char {
        self.display.get(&code_point).copied().unwrap_or(code_point)
    }
}
