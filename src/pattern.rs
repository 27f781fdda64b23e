//! Messaging patterns and the order in which they move data.
//!
//! A [`Pattern`] selects the socket kind opened on the endpoint and decides
//! whether the bridge sends standard input, receives to standard output, or
//! does both. Send-only roles never receive and receive-only roles never
//! send; the reply role answers what it was asked, so it receives first.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A single data movement performed by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Read standard input to completion and send it as one message.
    Send,
    /// Receive one message and write its frames to standard output.
    Receive,
}

/// Messaging role selected on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// One-way sender of a push/pull pipeline.
    #[default]
    Push,
    /// One-way receiver of a push/pull pipeline.
    Pull,
    /// Requesting side of request/reply.
    Req,
    /// Replying side of request/reply.
    Rep,
    /// Publishing side of publish/subscribe.
    Pub,
    /// Subscribing side of publish/subscribe.
    Sub,
}

impl Pattern {
    /// Every supported pattern, in command-line listing order.
    pub const ALL: [Pattern; 6] = [
        Pattern::Push,
        Pattern::Pull,
        Pattern::Req,
        Pattern::Rep,
        Pattern::Pub,
        Pattern::Sub,
    ];

    /// Lower-case name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Pattern::Push => "push",
            Pattern::Pull => "pull",
            Pattern::Req => "req",
            Pattern::Rep => "rep",
            Pattern::Pub => "pub",
            Pattern::Sub => "sub",
        }
    }

    /// The ordered data movements this role performs.
    ///
    /// # Examples
    ///
    /// ```
    /// use framecat::pattern::{Pattern, Step};
    ///
    /// assert_eq!(Pattern::Rep.steps(), &[Step::Receive, Step::Send]);
    /// assert_eq!(Pattern::Push.steps(), &[Step::Send]);
    /// ```
    #[must_use]
    pub const fn steps(self) -> &'static [Step] {
        match self {
            Pattern::Push | Pattern::Pub => &[Step::Send],
            Pattern::Pull | Pattern::Sub => &[Step::Receive],
            Pattern::Req => &[Step::Send, Step::Receive],
            Pattern::Rep => &[Step::Receive, Step::Send],
        }
    }

    /// Whether this role ever sends.
    #[must_use]
    pub fn sends(self) -> bool { self.steps().contains(&Step::Send) }

    /// Whether this role ever receives.
    #[must_use]
    pub fn receives(self) -> bool { self.steps().contains(&Step::Receive) }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Returned when a pattern name is not recognised.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown pattern `{0}` (expected push, pull, req, rep, pub or sub)")]
pub struct UnknownPattern(pub String);

impl FromStr for Pattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|pattern| pattern.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPattern(s.to_owned()))
    }
}
