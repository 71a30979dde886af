//! Tokens and source spans.

use super::ByteOffset;

/// Byte range in source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: ByteOffset,
    /// End offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(start: ByteOffset, end: ByteOffset) -> Self {
        Self { start, end }
    }

    /// Span covering both `self` and `other`.
    #[must_use]
    pub fn to(self, other: Span) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A token: kind plus location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Location in source.
    pub span: Span,
}

/// Token kinds recognised in SMI definition files.
///
/// Only the keywords the definition parser branches on get their own kind;
/// every other upper-case word (`MAX-ACCESS`, `STATUS`, `INTEGER`, ...) is an
/// [`UppercaseIdent`](TokenKind::UppercaseIdent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Lexical error.
    Error,
    /// End of input.
    Eof,

    /// Identifier starting with an upper-case letter.
    UppercaseIdent,
    /// Identifier starting with a lower-case letter.
    LowercaseIdent,
    /// Unsigned decimal number.
    Number,
    /// `"..."`.
    QuotedString,
    /// `'...'H`.
    HexString,
    /// `'...'B`.
    BinString,

    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `..`
    DotDot,
    /// `|`
    Pipe,
    /// `:`
    Colon,
    /// `-`
    Minus,
    /// `::=`
    ColonColonEqual,

    /// `DEFINITIONS`
    KwDefinitions,
    /// `BEGIN`
    KwBegin,
    /// `END`
    KwEnd,
    /// `IMPORTS`
    KwImports,
    /// `FROM`
    KwFrom,
    /// `EXPORTS`
    KwExports,
    /// `MACRO`
    KwMacro,
    /// `OBJECT`
    KwObject,
    /// `IDENTIFIER`
    KwIdentifier,
    /// `SEQUENCE`
    KwSequence,
    /// `OF`
    KwOf,
    /// `SYNTAX`
    KwSyntax,
    /// `INDEX`
    KwIndex,
    /// `AUGMENTS`
    KwAugments,
    /// `ENTERPRISE`
    KwEnterprise,

    /// `OBJECT-TYPE`
    KwObjectType,
    /// `MODULE-IDENTITY`
    KwModuleIdentity,
    /// `OBJECT-IDENTITY`
    KwObjectIdentity,
    /// `NOTIFICATION-TYPE`
    KwNotificationType,
    /// `TRAP-TYPE`
    KwTrapType,
    /// `OBJECT-GROUP`
    KwObjectGroup,
    /// `NOTIFICATION-GROUP`
    KwNotificationGroup,
    /// `MODULE-COMPLIANCE`
    KwModuleCompliance,
    /// `AGENT-CAPABILITIES`
    KwAgentCapabilities,
    /// `TEXTUAL-CONVENTION`
    KwTextualConvention,
}

impl TokenKind {
    /// Macros whose invocation assigns an OID: `name MACRO ... ::= { ... }`.
    #[must_use]
    pub fn is_oid_macro(self) -> bool {
        matches!(
            self,
            Self::KwObjectType
                | Self::KwModuleIdentity
                | Self::KwObjectIdentity
                | Self::KwNotificationType
                | Self::KwTrapType
                | Self::KwObjectGroup
                | Self::KwNotificationGroup
                | Self::KwModuleCompliance
                | Self::KwAgentCapabilities
        )
    }

    /// Macro names, including TEXTUAL-CONVENTION.
    #[must_use]
    pub fn is_macro_keyword(self) -> bool {
        self.is_oid_macro() || self == Self::KwTextualConvention
    }

    /// Tokens that can appear as a symbol in an IMPORTS list.
    #[must_use]
    pub fn is_importable(self) -> bool {
        matches!(self, Self::UppercaseIdent | Self::LowercaseIdent) || self.is_macro_keyword()
    }
}
