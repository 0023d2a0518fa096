// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group definitions: which code points exist and how they cluster.

/// Membership of one palette group.
///
/// A group's members are given either as an inclusive code-point range or as
/// an explicit list. Ranges are convenient for alphabetic runs; lists cover
/// punctuation and whitespace where the code points are not contiguous.
#[derive(Clone, Copy, Debug)]
pub enum GroupMembers {
    /// Every code point from `first` to `last`, inclusive.
    Range {
        /// First member.
        first: char,
        /// Last member, included.
        last: char,
    },
    /// An explicit list of code points, in palette order.
    Chars(&'static [char]),
}

impl GroupMembers {
    /// Iterates the member code points in palette order.
    pub fn iter(&self) -> impl Iterator<Item = char> {
        let (range, chars) = match *self {
            Self::Range { first, last } => (Some(first..=last), None),
            Self::Chars(chars) => (None, Some(chars.iter().copied())),
        };
        range.into_iter().flatten().chain(chars.into_iter().flatten())
    }
}

/// One entry in a palette's group list.
///
/// A named group becomes its own template node with the name as its style
/// class. An unnamed group splices its members directly into the root, so
/// they sit alongside the named groups rather than one level down.
#[derive(Clone, Copy, Debug)]
pub struct GroupDefinition {
    /// Group name, or `None` for members that live at the root.
    pub name: Option<&'static str>,
    /// The member code points.
    pub members: GroupMembers,
}

impl GroupDefinition {
    /// A named group.
    #[must_use]
    pub const fn named(name: &'static str, members: GroupMembers) -> Self {
        Self {
            name: Some(name),
            members,
        }
    }

    /// An unnamed group whose members splice into the root.
    #[must_use]
    pub const fn unnamed(members: GroupMembers) -> Self {
        Self {
            name: None,
            members,
        }
    }
}

const CONTRACTION: &[char] = &['\'', '-'];
const PUNCTUATION: &[char] = &[',', '.', '&', '!', '?', '+', '$', '\u{a2}', '\u{b0}', '\u{a3}'];
const SPACE: &[char] = &[' ', '\n'];

const DEFAULT_GROUPS: &[GroupDefinition] = &[
    GroupDefinition::unnamed(GroupMembers::Range {
        first: 'a',
        last: 'z',
    }),
    GroupDefinition::named(
        "capital",
        GroupMembers::Range {
            first: 'A',
            last: 'Z',
        },
    ),
    GroupDefinition::named(
        "numeral",
        GroupMembers::Range {
            first: '0',
            last: '9',
        },
    ),
    GroupDefinition::named("contraction", GroupMembers::Chars(CONTRACTION)),
    GroupDefinition::named("punctuation", GroupMembers::Chars(PUNCTUATION)),
    GroupDefinition::named("space", GroupMembers::Chars(SPACE)),
];

/// The stock Latin group list: lowercase at the root, then capitals,
/// numerals, contraction marks, punctuation, and whitespace as named groups.
#[must_use]
pub fn default_groups() -> &'static [GroupDefinition] {
    DEFAULT_GROUPS
}

// Space maps to the under-bracket and newline to the pilcrow, so that
// otherwise invisible symbols still have a visible target to steer into.
const DEFAULT_DISPLAY: &[(char, char)] = &[(' ', '\u{23b5}'), ('\n', '\u{b6}')];

/// Display substitutions for non-printing symbols.
#[must_use]
pub fn default_display_substitutions() -> &'static [(char, char)] {
    DEFAULT_DISPLAY
}
