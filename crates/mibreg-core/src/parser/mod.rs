//! SMI definition parser.
//!
//! Extracts the parts of a MIB that place names in the OID tree: module
//! headers, IMPORTS, and every definition carrying an `::= { ... }` value.
//! Clause contents (SYNTAX details, DESCRIPTION text, DEFVAL, ...) are
//! scanned only for what decides the node kind.
//!
//! The parser is lenient. Errors become diagnostics and parsing resumes at
//! the next definition.

// Source size is limited to u32::MAX bytes
#![allow(clippy::cast_possible_truncation)]

use crate::definition::{Definition, ImportClause, ModuleDefinition, NodeKind, OidComponent};
use crate::lexer::{Diagnostic, Lexer, Span, Token, TokenKind};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// SMI definition parser.
pub struct Parser<'src> {
    source: &'src [u8],
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

/// What a macro invocation's clauses revealed before `::=`.
#[derive(Default)]
struct ClauseScan {
    sequence_of: bool,
    indexed: bool,
    enterprise: Option<String>,
}

impl<'src> Parser<'src> {
    /// Tokenize `source` and prepare to parse it.
    #[must_use]
    pub fn new(source: &'src [u8]) -> Self {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        Self {
            source,
            tokens,
            pos: 0,
            diagnostics,
        }
    }

    /// Parse every module in the source.
    ///
    /// Returns the modules parsed so far together with all lexer and parser
    /// diagnostics. A malformed module header stops parsing, since nothing
    /// after it can be attributed to a module.
    #[must_use]
    pub fn parse_modules(mut self) -> (Vec<ModuleDefinition>, Vec<Diagnostic>) {
        let mut modules = Vec::new();
        while !self.is_eof() {
            match self.parse_module() {
                Ok(module) => modules.push(module),
                Err(diag) => {
                    self.diagnostics.push(diag);
                    break;
                }
            }
        }
        (modules, self.diagnostics)
    }

    fn parse_module(&mut self) -> Result<ModuleDefinition, Diagnostic> {
        let name = self.parse_module_header()?;
        let mut module = ModuleDefinition::new(name);

        if self.check(TokenKind::KwImports) {
            match self.parse_imports() {
                Ok(imports) => module.imports = imports,
                Err(diag) => {
                    self.diagnostics.push(diag);
                    self.recover_to_definition();
                }
            }
        }

        while !self.check(TokenKind::KwEnd) && !self.is_eof() {
            let start = self.pos;
            match self.parse_definition(&mut module) {
                Ok(Some(def)) => module.definitions.push(def),
                Ok(None) => {}
                Err(diag) => {
                    self.diagnostics.push(diag);
                    if self.pos == start {
                        self.advance();
                    }
                    self.recover_to_definition();
                }
            }
        }

        if self.check(TokenKind::KwEnd) {
            self.advance();
        } else {
            let diag = self.error(&format!("module {} is missing END", module.name));
            self.diagnostics.push(diag);
        }
        Ok(module)
    }

    // === Token access ===

    fn eof_token(&self) -> Token {
        let end = self.source.len() as u32;
        Token {
            kind: TokenKind::Eof,
            span: Span::new(end, end),
        }
    }

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("expected {kind:?}, found {:?}", self.peek().kind)))
        }
    }

    fn text(&self, span: Span) -> &str {
        let bytes = &self.source[span.start as usize..span.end as usize];
        core::str::from_utf8(bytes).unwrap_or("")
    }

    fn error(&self, message: &str) -> Diagnostic {
        Diagnostic::error(self.peek().span, message)
    }

    /// Parse a u32, falling back to 0 with a diagnostic.
    fn parse_u32(&mut self, span: Span) -> u32 {
        if let Ok(value) = self.text(span).parse::<u32>() {
            value
        } else {
            let message = format!("OID arc {} does not fit in 32 bits", self.text(span));
            self.diagnostics.push(Diagnostic::error(span, message));
            0
        }
    }

    // === Module structure ===

    /// `Name DEFINITIONS ::= BEGIN`
    fn parse_module_header(&mut self) -> Result<String, Diagnostic> {
        let name = self.expect(TokenKind::UppercaseIdent)?;
        self.expect(TokenKind::KwDefinitions)?;
        self.expect(TokenKind::ColonColonEqual)?;
        self.expect(TokenKind::KwBegin)?;
        Ok(self.text(name.span).into())
    }

    /// `IMPORTS a, b FROM M1 c FROM M2 ;`
    fn parse_imports(&mut self) -> Result<Vec<ImportClause>, Diagnostic> {
        self.expect(TokenKind::KwImports)?;
        let mut imports = Vec::new();

        loop {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                break;
            }
            if self.is_eof() || self.check(TokenKind::KwEnd) {
                return Err(self.error("unterminated IMPORTS"));
            }

            let mut symbols = Vec::new();
            while !self.check(TokenKind::KwFrom) {
                if !self.peek().kind.is_importable() {
                    return Err(self.error("expected symbol or FROM"));
                }
                let token = self.advance();
                symbols.push(String::from(self.text(token.span)));
                if self.check(TokenKind::Comma) {
                    self.advance();
                }
            }
            self.expect(TokenKind::KwFrom)?;
            let from = self.expect(TokenKind::UppercaseIdent)?;
            imports.push(ImportClause {
                symbols,
                from_module: self.text(from.span).into(),
            });
        }

        Ok(imports)
    }

    /// Parse one definition. Definitions that carry no OID (type
    /// assignments, macro definitions, EXPORTS) yield `None`.
    fn parse_definition(
        &mut self,
        module: &mut ModuleDefinition,
    ) -> Result<Option<Definition>, Diagnostic> {
        let first = self.peek().kind;
        let second = self.peek_nth(1).kind;

        match (first, second) {
            (TokenKind::LowercaseIdent, TokenKind::KwObject)
                if self.peek_nth(2).kind == TokenKind::KwIdentifier =>
            {
                self.parse_value_assignment().map(Some)
            }
            (TokenKind::LowercaseIdent, kind) if kind.is_oid_macro() => {
                let def = self.parse_macro_invocation()?;
                if kind == TokenKind::KwModuleIdentity && module.identity.is_none() {
                    module.identity = Some(def.name.clone());
                }
                Ok(Some(def))
            }
            (TokenKind::UppercaseIdent, TokenKind::ColonColonEqual | TokenKind::KwTextualConvention) => {
                self.skip_type_assignment();
                Ok(None)
            }
            (kind, TokenKind::KwMacro) if kind == TokenKind::UppercaseIdent || kind.is_macro_keyword() => {
                self.advance();
                self.advance();
                self.expect(TokenKind::KwEnd)?;
                Ok(None)
            }
            (TokenKind::KwExports, _) => {
                self.advance();
                if self.check(TokenKind::Semicolon) {
                    self.advance();
                }
                Ok(None)
            }
            (TokenKind::LowercaseIdent, _) => {
                let name = self.advance();
                let diag = Diagnostic::warning(
                    name.span,
                    format!("skipping unsupported assignment {}", self.text(name.span)),
                );
                self.diagnostics.push(diag);
                self.recover_to_definition();
                Ok(None)
            }
            _ => Err(self.error(&format!("unexpected token {first:?}"))),
        }
    }

    /// `name OBJECT IDENTIFIER ::= { ... }`
    fn parse_value_assignment(&mut self) -> Result<Definition, Diagnostic> {
        let name = self.advance();
        self.expect(TokenKind::KwObject)?;
        self.expect(TokenKind::KwIdentifier)?;
        self.expect(TokenKind::ColonColonEqual)?;
        let oid = self.parse_oid_value()?;
        Ok(Definition::new(self.text(name.span), NodeKind::Node, oid))
    }

    /// `name MACRO clauses ::= value`
    fn parse_macro_invocation(&mut self) -> Result<Definition, Diagnostic> {
        let name_token = self.advance();
        let name = String::from(self.text(name_token.span));
        let macro_kind = self.advance().kind;

        let scan = self.scan_clauses()?;
        self.expect(TokenKind::ColonColonEqual)?;

        let kind = match macro_kind {
            TokenKind::KwObjectType if scan.sequence_of => NodeKind::Table,
            TokenKind::KwObjectType if scan.indexed => NodeKind::Row,
            TokenKind::KwObjectType => NodeKind::Scalar,
            TokenKind::KwNotificationType | TokenKind::KwTrapType => NodeKind::Notification,
            TokenKind::KwObjectGroup | TokenKind::KwNotificationGroup => NodeKind::Group,
            TokenKind::KwModuleCompliance => NodeKind::Compliance,
            TokenKind::KwAgentCapabilities => NodeKind::Capabilities,
            _ => NodeKind::Node,
        };

        let oid = if macro_kind == TokenKind::KwTrapType {
            let Some(enterprise) = scan.enterprise else {
                return Err(Diagnostic::error(
                    name_token.span,
                    format!("TRAP-TYPE {name} has no ENTERPRISE"),
                ));
            };
            let number = self.expect(TokenKind::Number)?;
            let specific = self.parse_u32(number.span);
            vec![
                OidComponent::Name(enterprise),
                OidComponent::Number(0),
                OidComponent::Number(specific),
            ]
        } else {
            self.parse_oid_value()?
        };

        Ok(Definition::new(name, kind, oid))
    }

    /// Walk macro clauses up to the `::=` that introduces the value.
    fn scan_clauses(&mut self) -> Result<ClauseScan, Diagnostic> {
        let mut scan = ClauseScan::default();
        let mut depth = 0usize;

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::ColonColonEqual if depth == 0 => return Ok(scan),
                TokenKind::Eof | TokenKind::KwEnd => {
                    return Err(self.error("expected ::= after macro clauses"));
                }
                _ if depth == 0 && self.at_definition_start() => {
                    return Err(self.error("expected ::= after macro clauses"));
                }
                TokenKind::LBrace | TokenKind::LParen => depth += 1,
                TokenKind::RBrace | TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::KwSyntax
                    if self.peek_nth(1).kind == TokenKind::KwSequence
                        && self.peek_nth(2).kind == TokenKind::KwOf =>
                {
                    scan.sequence_of = true;
                }
                TokenKind::KwIndex | TokenKind::KwAugments if depth == 0 => scan.indexed = true,
                TokenKind::KwEnterprise => {
                    let next = self.peek_nth(1);
                    if next.kind == TokenKind::LowercaseIdent {
                        scan.enterprise = Some(self.text(next.span).into());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// `{ iso org(3) dod(6) 1 }`
    fn parse_oid_value(&mut self) -> Result<Vec<OidComponent>, Diagnostic> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut components = Vec::new();

        while !self.check(TokenKind::RBrace) {
            let token = self.peek();
            match token.kind {
                TokenKind::Number => {
                    self.advance();
                    let arc = self.parse_u32(token.span);
                    components.push(OidComponent::Number(arc));
                }
                TokenKind::LowercaseIdent | TokenKind::UppercaseIdent => {
                    self.advance();
                    let name = String::from(self.text(token.span));
                    if self.check(TokenKind::LParen) {
                        self.advance();
                        let number = self.expect(TokenKind::Number)?;
                        let arc = self.parse_u32(number.span);
                        self.expect(TokenKind::RParen)?;
                        components.push(OidComponent::NamedNumber { name, number: arc });
                    } else {
                        components.push(OidComponent::Name(name));
                    }
                }
                _ => return Err(self.error("expected OID component")),
            }
        }
        self.advance();

        if components.is_empty() {
            return Err(Diagnostic::error(open.span, "empty OID value"));
        }
        Ok(components)
    }

    // === Skipping and recovery ===

    /// Skip `Type ::= ...` or `Type ::= TEXTUAL-CONVENTION ...`. The body
    /// ends where the next definition starts at brace depth zero.
    fn skip_type_assignment(&mut self) {
        self.advance();
        self.advance();
        let mut depth = 0usize;
        loop {
            let kind = self.peek().kind;
            match kind {
                TokenKind::Eof => return,
                TokenKind::KwEnd if depth == 0 => return,
                _ if depth == 0 && self.at_definition_start() => return,
                TokenKind::LBrace | TokenKind::LParen => depth += 1,
                TokenKind::RBrace | TokenKind::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    /// True if the current token starts a definition.
    fn at_definition_start(&self) -> bool {
        let current = self.peek().kind;
        let next = self.peek_nth(1).kind;
        (current == TokenKind::LowercaseIdent && next.is_oid_macro())
            || (current == TokenKind::LowercaseIdent
                && next == TokenKind::KwObject
                && self.peek_nth(2).kind == TokenKind::KwIdentifier)
            || (current == TokenKind::UppercaseIdent
                && matches!(
                    next,
                    TokenKind::ColonColonEqual | TokenKind::KwTextualConvention
                ))
            || (next == TokenKind::KwMacro
                && (current == TokenKind::UppercaseIdent || current.is_macro_keyword()))
    }

    /// Skip to the next definition start, END, or end of input.
    fn recover_to_definition(&mut self) {
        while !self.is_eof() && !self.check(TokenKind::KwEnd) && !self.at_definition_start() {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Severity;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (Vec<ModuleDefinition>, Vec<Diagnostic>) {
        Parser::new(source.as_bytes()).parse_modules()
    }

    fn name(s: &str) -> OidComponent {
        OidComponent::Name(s.into())
    }

    #[test]
    fn test_empty_module() {
        let (modules, diagnostics) = parse("TEST-MIB DEFINITIONS ::= BEGIN END");
        assert_eq!(modules, vec![ModuleDefinition::new("TEST-MIB")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_imports() {
        let (modules, _) = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
            IMPORTS
                MODULE-IDENTITY, OBJECT-TYPE, mib-2 FROM SNMPv2-SMI
                DisplayString FROM SNMPv2-TC;
            END",
        );
        let module = &modules[0];
        assert_eq!(module.imports.len(), 2);
        assert_eq!(
            module.imports[0].symbols,
            vec!["MODULE-IDENTITY", "OBJECT-TYPE", "mib-2"]
        );
        assert_eq!(module.import_source("DisplayString"), Some("SNMPv2-TC"));
    }

    #[test]
    fn test_value_assignment() {
        let (modules, _) = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
            testRoot OBJECT IDENTIFIER ::= { iso org(3) 6 }
            END",
        );
        assert_eq!(
            modules[0].definitions,
            vec![Definition::new(
                "testRoot",
                NodeKind::Node,
                vec![
                    name("iso"),
                    OidComponent::NamedNumber {
                        name: "org".into(),
                        number: 3
                    },
                    OidComponent::Number(6),
                ],
            )]
        );
    }

    #[test]
    fn test_object_type_kinds() {
        let (modules, diagnostics) = parse(
            r#"IF-MIB DEFINITIONS ::= BEGIN
            ifTable OBJECT-TYPE
                SYNTAX      SEQUENCE OF IfEntry
                MAX-ACCESS  not-accessible
                STATUS      current
                DESCRIPTION "A list of interface entries."
                ::= { interfaces 2 }
            ifEntry OBJECT-TYPE
                SYNTAX      IfEntry
                MAX-ACCESS  not-accessible
                STATUS      current
                DESCRIPTION "An entry."
                INDEX   { ifIndex }
                ::= { ifTable 1 }
            IfEntry ::= SEQUENCE { ifIndex InterfaceIndex, ifDescr DisplayString }
            ifDescr OBJECT-TYPE
                SYNTAX      DisplayString (SIZE (0..255))
                MAX-ACCESS  read-only
                STATUS      current
                DESCRIPTION "Description."
                ::= { ifEntry 2 }
            END"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let kinds: Vec<_> = modules[0]
            .definitions
            .iter()
            .map(|d| (d.name.as_str(), d.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("ifTable", NodeKind::Table),
                ("ifEntry", NodeKind::Row),
                ("ifDescr", NodeKind::Scalar),
            ]
        );
    }

    #[test]
    fn test_module_identity_recorded() {
        let (modules, _) = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
            testMIB MODULE-IDENTITY
                LAST-UPDATED "202401010000Z"
                ORGANIZATION "Example"
                CONTACT-INFO "nobody"
                DESCRIPTION  "Test."
                REVISION     "202401010000Z"
                DESCRIPTION  "Initial."
                ::= { enterprises 99999 }
            END"#,
        );
        let module = &modules[0];
        assert_eq!(module.identity.as_deref(), Some("testMIB"));
        assert_eq!(module.definitions[0].kind, NodeKind::Node);
    }

    #[test]
    fn test_trap_type() {
        let (modules, _) = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
            linkDownTrap TRAP-TYPE
                ENTERPRISE  testRoot
                VARIABLES   { ifIndex }
                DESCRIPTION "Link down."
                ::= 2
            END"#,
        );
        let def = &modules[0].definitions[0];
        assert_eq!(def.kind, NodeKind::Notification);
        assert_eq!(
            def.oid,
            vec![
                name("testRoot"),
                OidComponent::Number(0),
                OidComponent::Number(2)
            ]
        );
    }

    #[test]
    fn test_textual_convention_and_macro_skipped() {
        let (modules, diagnostics) = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
            OBJECT-TYPE MACRO ::= BEGIN
                TYPE NOTATION ::= "SYNTAX" Syntax
            END
            TestString ::= TEXTUAL-CONVENTION
                DISPLAY-HINT "255a"
                STATUS       current
                DESCRIPTION  "Text."
                SYNTAX       OCTET STRING (SIZE (0..255))
            TestStatus ::= INTEGER { up(1), down(2) }
            testRoot OBJECT IDENTIFIER ::= { enterprises 1 }
            END"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(modules[0].definitions.len(), 1);
        assert_eq!(modules[0].definitions[0].name, "testRoot");
    }

    #[test]
    fn test_groups_and_compliance() {
        let (modules, _) = parse(
            r#"TEST-MIB DEFINITIONS ::= BEGIN
            testGroup OBJECT-GROUP
                OBJECTS { testValue }
                STATUS  current
                DESCRIPTION "Objects."
                ::= { testConformance 1 }
            testCompliance MODULE-COMPLIANCE
                STATUS  current
                DESCRIPTION "Compliance."
                MODULE
                    MANDATORY-GROUPS { testGroup }
                    OBJECT testValue
                        SYNTAX INTEGER (0..10)
                        DESCRIPTION "Restricted."
                ::= { testConformance 2 }
            END"#,
        );
        let kinds: Vec<_> = modules[0].definitions.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![NodeKind::Group, NodeKind::Compliance]);
    }

    #[test]
    fn test_multiple_modules_in_one_source() {
        let (modules, diagnostics) = parse(
            "A-MIB DEFINITIONS ::= BEGIN a OBJECT IDENTIFIER ::= { iso 1 } END
             B-MIB DEFINITIONS ::= BEGIN b OBJECT IDENTIFIER ::= { iso 2 } END",
        );
        assert!(diagnostics.is_empty());
        let names: Vec<_> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A-MIB", "B-MIB"]);
    }

    #[test]
    fn test_recovery_keeps_later_definitions() {
        let (modules, diagnostics) = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN
            broken OBJECT IDENTIFIER ::= { }
            good OBJECT IDENTIFIER ::= { iso 7 }
            END",
        );
        assert_eq!(modules[0].definitions.len(), 1);
        assert_eq!(modules[0].definitions[0].name, "good");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_bad_header_stops_parsing() {
        let (modules, diagnostics) = parse("not a module");
        assert!(modules.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_end_reported() {
        let (modules, diagnostics) =
            parse("TEST-MIB DEFINITIONS ::= BEGIN a OBJECT IDENTIFIER ::= { iso 1 }");
        assert_eq!(modules.len(), 1);
        assert!(diagnostics[0].message.contains("missing END"));
    }

    #[test]
    fn test_arc_overflow_is_diagnosed() {
        let (modules, diagnostics) = parse(
            "TEST-MIB DEFINITIONS ::= BEGIN a OBJECT IDENTIFIER ::= { iso 99999999999 } END",
        );
        assert_eq!(modules[0].definitions.len(), 1);
        assert_eq!(diagnostics.len(), 1);
    }
}
