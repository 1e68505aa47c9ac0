//! Sample gate documents shared by tests across the workspace.
//!
//! Keep these stable: downstream crates assert exact offsets, traces and reports
//! against them.

/// A complete ritual exercising every token class and block kind.
pub const SAMPLE_RITUAL: &str = r#"@meta:: title="The Torchbearer Rite" %MODEL%
!admin:: set:: STATUS="ACTIVE"

#==SECTION: Gate Thirteen
> DECLARATION::FORMAL: """
I stand at gate:13 and name the keeper.
"""
> FUNCTION_CALL: break_gate(13) ? confirm:"YES"
!!IRREVERSIBLE ϟ [SLEDGE:=>1]
> STATE_CHANGE: gate:13 Δ gate:12
↯ %INTENT% ⌘ ⌾ ⇜ ⇝ ⇹
#==TRACE:ECHO
!rule:: echo_once
"#;

/// A call block that breaks a gate without confirming it.
pub const SAMPLE_UNCONFIRMED_BREAK: &str = "> FUNCTION_CALL: break_gate()";

/// A document with no call or state blocks.
pub const SAMPLE_NO_BLOCKS: &str = "#==SECTION: Prelude\n%MODEL% Δ quiet words\n";
