//! Keyword table.

use super::TokenKind;

/// Map an identifier to its keyword kind, if it is one the parser uses.
#[must_use]
pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "DEFINITIONS" => TokenKind::KwDefinitions,
        "BEGIN" => TokenKind::KwBegin,
        "END" => TokenKind::KwEnd,
        "IMPORTS" => TokenKind::KwImports,
        "FROM" => TokenKind::KwFrom,
        "EXPORTS" => TokenKind::KwExports,
        "MACRO" => TokenKind::KwMacro,
        "OBJECT" => TokenKind::KwObject,
        "IDENTIFIER" => TokenKind::KwIdentifier,
        "SEQUENCE" => TokenKind::KwSequence,
        "OF" => TokenKind::KwOf,
        "SYNTAX" => TokenKind::KwSyntax,
        "INDEX" => TokenKind::KwIndex,
        "AUGMENTS" => TokenKind::KwAugments,
        "ENTERPRISE" => TokenKind::KwEnterprise,
        "OBJECT-TYPE" => TokenKind::KwObjectType,
        "MODULE-IDENTITY" => TokenKind::KwModuleIdentity,
        "OBJECT-IDENTITY" => TokenKind::KwObjectIdentity,
        "NOTIFICATION-TYPE" => TokenKind::KwNotificationType,
        "TRAP-TYPE" => TokenKind::KwTrapType,
        "OBJECT-GROUP" => TokenKind::KwObjectGroup,
        "NOTIFICATION-GROUP" => TokenKind::KwNotificationGroup,
        "MODULE-COMPLIANCE" => TokenKind::KwModuleCompliance,
        "AGENT-CAPABILITIES" => TokenKind::KwAgentCapabilities,
        "TEXTUAL-CONVENTION" => TokenKind::KwTextualConvention,
        _ => return None,
    };
    Some(kind)
}
