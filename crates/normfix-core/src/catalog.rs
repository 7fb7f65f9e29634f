//! Static rule catalog.
//!
//! Every norminette rule this crate knows about is a [`RuleCode`] variant with
//! a `const` [`RuleProfile`]. Codes outside the enum resolve to
//! [`FALLBACK_PROFILE`].

use crate::types::{FixComplexity, Severity};
use serde::Serialize;

/// Fix template used for rule codes outside the catalog.
pub const MANUAL_FIX: &str = "Manual fix required";

/// Everything the catalog knows about one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleProfile {
    /// Impact of the violation.
    pub severity: Severity,
    /// Effort to fix it.
    pub fix_complexity: FixComplexity,
    /// Whether a pass fixes it.
    pub auto_fixable: bool,
    /// Short explanation of the rule.
    pub description: &'static str,
    /// Base fix suggestion.
    pub fix_template: &'static str,
}

/// Profile applied to unknown rule codes.
pub const FALLBACK_PROFILE: RuleProfile = RuleProfile {
    severity: Severity::Medium,
    fix_complexity: FixComplexity::Simple,
    auto_fixable: false,
    description: "",
    fix_template: MANUAL_FIX,
};

/// Known norminette rule codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum RuleCode {
    TooLongLine,
    TooManyLines,
    TooManyFuncs,
    TooManyParams,
    SpaceBeforeFunc,
    SpaceAfterKw,
    SpaceReplaceTab,
    TabReplaceSpace,
    IndentBranch,
    IndentMultBranch,
    BraceNewline,
    BraceShouldEol,
    BraceShouldNewline,
    VarDeclStartFunc,
    DeclAssignLine,
    HeaderMissing,
    InvalidHeader,
    WrongScopeComment,
    EmptyLineFunction,
    EmptyLineEof,
    NewlinePrecedesFunc,
    ConsecutiveNewlines,
}

impl RuleCode {
    /// Every catalog entry, in catalog order.
    pub const ALL: [Self; 22] = [
        Self::TooLongLine,
        Self::TooManyLines,
        Self::TooManyFuncs,
        Self::TooManyParams,
        Self::SpaceBeforeFunc,
        Self::SpaceAfterKw,
        Self::SpaceReplaceTab,
        Self::TabReplaceSpace,
        Self::IndentBranch,
        Self::IndentMultBranch,
        Self::BraceNewline,
        Self::BraceShouldEol,
        Self::BraceShouldNewline,
        Self::VarDeclStartFunc,
        Self::DeclAssignLine,
        Self::HeaderMissing,
        Self::InvalidHeader,
        Self::WrongScopeComment,
        Self::EmptyLineFunction,
        Self::EmptyLineEof,
        Self::NewlinePrecedesFunc,
        Self::ConsecutiveNewlines,
    ];

    /// The code as norminette prints it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooLongLine => "TOO_LONG_LINE",
            Self::TooManyLines => "TOO_MANY_LINES",
            Self::TooManyFuncs => "TOO_MANY_FUNCS",
            Self::TooManyParams => "TOO_MANY_PARAMS",
            Self::SpaceBeforeFunc => "SPACE_BEFORE_FUNC",
            Self::SpaceAfterKw => "SPACE_AFTER_KW",
            Self::SpaceReplaceTab => "SPACE_REPLACE_TAB",
            Self::TabReplaceSpace => "TAB_REPLACE_SPACE",
            Self::IndentBranch => "INDENT_BRANCH",
            Self::IndentMultBranch => "INDENT_MULT_BRANCH",
            Self::BraceNewline => "BRACE_NEWLINE",
            Self::BraceShouldEol => "BRACE_SHOULD_EOL",
            Self::BraceShouldNewline => "BRACE_SHOULD_NEWLINE",
            Self::VarDeclStartFunc => "VAR_DECL_START_FUNC",
            Self::DeclAssignLine => "DECL_ASSIGN_LINE",
            Self::HeaderMissing => "HEADER_MISSING",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::WrongScopeComment => "WRONG_SCOPE_COMMENT",
            Self::EmptyLineFunction => "EMPTY_LINE_FUNCTION",
            Self::EmptyLineEof => "EMPTY_LINE_EOF",
            Self::NewlinePrecedesFunc => "NEWLINE_PRECEDES_FUNC",
            Self::ConsecutiveNewlines => "CONSECUTIVE_NEWLINES",
        }
    }

    /// Exact-match lookup of a rule code string.
    #[must_use]
    pub fn lookup(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.as_str() == code)
    }

    /// The catalog profile for this rule.
    #[must_use]
    pub const fn profile(self) -> &'static RuleProfile {
        match self {
            Self::TooLongLine => &RuleProfile {
                severity: Severity::Medium,
                fix_complexity: FixComplexity::Simple,
                auto_fixable: true,
                description: "Line exceeds 80 character limit",
                fix_template: "Break line at logical points (operators, commas, function calls)",
            },
            Self::TooManyLines => &RuleProfile {
                severity: Severity::High,
                fix_complexity: FixComplexity::Moderate,
                auto_fixable: false,
                description: "Function exceeds 25 line limit",
                fix_template: "Split function into smaller, more focused functions",
            },
            Self::TooManyFuncs => &RuleProfile {
                severity: Severity::High,
                fix_complexity: FixComplexity::Complex,
                auto_fixable: false,
                description: "File contains too many functions",
                fix_template: "Move some functions to separate files or combine related functions",
            },
            Self::TooManyParams => &RuleProfile {
                severity: Severity::Medium,
                fix_complexity: FixComplexity::Moderate,
                auto_fixable: false,
                description: "Function has too many parameters",
                fix_template: "Use structures to group related parameters or split function",
            },
            Self::SpaceBeforeFunc => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Unexpected space before function name",
                fix_template: "Remove space before function name",
            },
            Self::SpaceAfterKw => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Missing space after keyword",
                fix_template: "Add space after keyword (if, while, for, etc.)",
            },
            Self::SpaceReplaceTab => &RuleProfile {
                severity: Severity::Medium,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Spaces used for indentation instead of tabs",
                fix_template: "Replace spaces with tabs for indentation",
            },
            Self::TabReplaceSpace => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Tab used where space is required",
                fix_template: "Replace tab with space where appropriate",
            },
            Self::IndentBranch => &RuleProfile {
                severity: Severity::Medium,
                fix_complexity: FixComplexity::Simple,
                auto_fixable: true,
                description: "Incorrect indentation",
                fix_template: "Use tabs for indentation, align with proper scope level",
            },
            Self::IndentMultBranch => &RuleProfile {
                severity: Severity::Medium,
                fix_complexity: FixComplexity::Simple,
                auto_fixable: true,
                description: "Incorrect indentation in multiple branch structure",
                fix_template: "Fix indentation in multiple branch structures",
            },
            Self::BraceNewline => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Missing newline after opening brace",
                fix_template: "Add newline after opening brace",
            },
            Self::BraceShouldEol => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Brace should be at end of line",
                fix_template: "Move opening brace to end of line",
            },
            Self::BraceShouldNewline => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Opening brace should be followed by newline",
                fix_template: "Add newline after opening brace",
            },
            Self::VarDeclStartFunc => &RuleProfile {
                severity: Severity::Medium,
                fix_complexity: FixComplexity::Simple,
                auto_fixable: false,
                description: "Variable declarations must be at function start",
                fix_template: "Move all variable declarations to the beginning of function",
            },
            Self::DeclAssignLine => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Simple,
                auto_fixable: false,
                description: "Variable declaration and assignment on same line",
                fix_template: "Separate variable declaration and assignment",
            },
            Self::HeaderMissing => &RuleProfile {
                severity: Severity::Critical,
                fix_complexity: FixComplexity::Simple,
                auto_fixable: true,
                description: "File missing required 42 header",
                fix_template: "Add standard 42 header at the beginning of file",
            },
            // Marked fixable in the rule table, but no pass is triggered by it:
            // a malformed header is not rewritten.
            Self::InvalidHeader => &RuleProfile {
                severity: Severity::High,
                fix_complexity: FixComplexity::Simple,
                auto_fixable: true,
                description: "Header format does not match 42 standard",
                fix_template: "Fix header format to match 42 standard",
            },
            Self::WrongScopeComment => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Incorrect scope comment format",
                fix_template: "Use /* */ for multi-line comments, // for single line",
            },
            Self::EmptyLineFunction => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Empty line found inside function",
                fix_template: "Remove empty lines inside functions",
            },
            Self::EmptyLineEof => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Empty line at end of file",
                fix_template: "Remove empty line at end of file",
            },
            Self::NewlinePrecedesFunc => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Function should be preceded by newline",
                fix_template: "Add newline before function definition",
            },
            Self::ConsecutiveNewlines => &RuleProfile {
                severity: Severity::Low,
                fix_complexity: FixComplexity::Trivial,
                auto_fixable: true,
                description: "Multiple consecutive newlines found",
                fix_template: "Remove consecutive empty lines",
            },
        }
    }

    /// Rules that commonly appear alongside this one.
    #[must_use]
    pub const fn related(self) -> &'static [Self] {
        match self {
            Self::TooLongLine => &[Self::SpaceBeforeFunc, Self::SpaceAfterKw],
            Self::TooManyLines => &[Self::TooManyFuncs, Self::VarDeclStartFunc],
            Self::IndentBranch => &[Self::BraceNewline, Self::BraceShouldEol],
            Self::SpaceBeforeFunc => &[Self::TooLongLine, Self::SpaceAfterKw],
            Self::BraceNewline => &[Self::BraceShouldEol, Self::IndentBranch],
            Self::VarDeclStartFunc => &[Self::TooManyLines],
            _ => &[],
        }
    }

    /// Unit used when quantifying the excess of a "(current/limit)" rule.
    ///
    /// `None` for rules whose descriptions carry no such pair.
    #[must_use]
    pub const fn excess_unit(self) -> Option<&'static str> {
        match self {
            Self::TooLongLine => Some("characters"),
            Self::TooManyLines => Some("lines"),
            Self::TooManyParams => Some("parameters"),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a rule code string to its profile, falling back for unknown codes.
#[must_use]
pub fn profile_for(code: &str) -> &'static RuleProfile {
    RuleCode::lookup(code).map_or(&FALLBACK_PROFILE, RuleCode::profile)
}

/// Coarse category the linter collaborator assigns to a rule code.
#[must_use]
pub fn category_for(code: &str) -> &'static str {
    match code {
        "TOO_MANY_LINES" | "TOO_LONG_LINE" => "line_length",
        "TOO_MANY_FUNCS" => "function_count",
        "TOO_MANY_PARAMS" => "function_params",
        "SPACE_BEFORE_FUNC" | "SPACE_AFTER_KW" => "spacing",
        "INDENT_BRANCH" | "INDENT_MULT_BRANCH" => "indentation",
        "WRONG_SCOPE_COMMENT" => "comments",
        "MISSING_IDENTIFIER" | "HEADER_MISSING" => "header",
        "BRACE_NEWLINE" | "BRACE_SHOULD_EOL" => "braces",
        "VAR_DECL_START_FUNC" | "DECL_ASSIGN_LINE" => "variables",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_round_trips_every_code() {
        for rule in RuleCode::ALL {
            assert_eq!(RuleCode::lookup(rule.as_str()), Some(rule));
        }
    }

    #[test]
    fn lookup_is_exact_match() {
        assert_eq!(RuleCode::lookup("too_long_line"), None);
        assert_eq!(RuleCode::lookup(" TOO_LONG_LINE"), None);
    }

    #[test]
    fn unknown_code_gets_fallback() {
        let profile = profile_for("NOT_A_RULE");
        assert_eq!(*profile, FALLBACK_PROFILE);
        assert_eq!(profile.severity, Severity::Medium);
        assert_eq!(profile.fix_complexity, FixComplexity::Simple);
        assert!(!profile.auto_fixable);
    }

    #[test]
    fn header_missing_is_critical_and_fixable() {
        let profile = RuleCode::HeaderMissing.profile();
        assert_eq!(profile.severity, Severity::Critical);
        assert!(profile.auto_fixable);
    }

    #[test]
    fn related_table_is_empty_for_unlisted_rules() {
        assert!(RuleCode::EmptyLineEof.related().is_empty());
        assert_eq!(
            RuleCode::VarDeclStartFunc.related(),
            &[RuleCode::TooManyLines]
        );
    }

    #[test]
    fn categories_match_linter_mapping() {
        assert_eq!(category_for("SPACE_AFTER_KW"), "spacing");
        assert_eq!(category_for("INDENT_BRANCH"), "indentation");
        assert_eq!(category_for("SPACE_REPLACE_TAB"), "other");
        assert_eq!(category_for("UNKNOWN"), "other");
    }
}
