//! LLM response parsing into a typed [`AgentDecision`].
//!
//! The LLM calls one of two tools: `update_focus` or `take_action`, per the
//! schema described in `actions.j2`. It returns JSON describing which tool
//! it invoked and with what arguments. Malformed responses are handled
//! gracefully by falling back to no decision at all -- the runner simply
//! tries again next cycle.

use shard_types::enums::{ActionType, Profession};
use shard_types::ids::ZoneId;
use shard_types::structs::{AgentFocus, AgentStrategy};
use tracing::warn;

use crate::error::RunnerError;

/// The coarse decision an LLM call produced, before target resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentDecision {
    /// Change the agent's autonomous behavior focus and/or strategy.
    UpdateFocus {
        focus: Option<AgentFocus>,
        strategy: Option<AgentStrategy>,
        target_zone: Option<ZoneId>,
    },
    /// Take a concrete action this cycle; [`crate::focus::resolve_action`]
    /// fills in the target.
    TakeAction {
        action_type: ActionType,
        profession: Option<Profession>,
    },
}

/// The parsed decision from an LLM response, or `None` if parsing failed.
#[derive(Debug, Clone)]
pub struct ParsedDecision {
    /// The tool call the agent made, if the response could be parsed.
    pub decision: Option<AgentDecision>,
    /// The agent's reasoning (logged for debugging, not applied to state).
    pub reasoning: Option<String>,
}

/// Intermediate struct for deserializing the LLM's raw JSON response.
#[derive(Debug, serde::Deserialize)]
struct RawLlmResponse {
    tool: String,
    #[serde(default)]
    parameters: serde_json::Value,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Parse an LLM response string into a [`ParsedDecision`].
///
/// Attempts multiple recovery strategies if the raw text is not clean JSON:
/// 1. Direct `serde_json` deserialization
/// 2. Extract JSON from a markdown code block
/// 3. Strip trailing commas and retry
/// 4. Both of the above combined
///
/// If every strategy fails, returns a decision-less [`ParsedDecision`] with
/// a warning logged.
pub fn parse_llm_response(raw: &str) -> ParsedDecision {
    match try_parse(raw) {
        Ok(decision) => decision,
        Err(e) => {
            warn!(
                error = %e,
                raw_response = raw,
                "failed to parse LLM response, taking no action this cycle"
            );
            no_decision()
        }
    }
}

fn try_parse(raw: &str) -> Result<ParsedDecision, RunnerError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = serde_json::from_str::<RawLlmResponse>(trimmed) {
        return convert_raw_response(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed)
        && let Ok(parsed) = serde_json::from_str::<RawLlmResponse>(json_str)
    {
        return convert_raw_response(parsed);
    }

    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<RawLlmResponse>(&cleaned) {
        return convert_raw_response(parsed);
    }

    if let Some(json_str) = extract_json_from_codeblock(trimmed) {
        let cleaned_inner = strip_trailing_commas(json_str);
        if let Ok(parsed) = serde_json::from_str::<RawLlmResponse>(&cleaned_inner) {
            return convert_raw_response(parsed);
        }
    }

    Err(RunnerError::Parse(format!(
        "all parse strategies failed for: {trimmed}"
    )))
}

fn convert_raw_response(raw: RawLlmResponse) -> Result<ParsedDecision, RunnerError> {
    let decision = build_decision(&raw.tool, &raw.parameters)?;
    Ok(ParsedDecision {
        decision: Some(decision),
        reasoning: raw.reasoning,
    })
}

/// Build a typed [`AgentDecision`] from the tool name and raw JSON params.
fn build_decision(tool: &str, params: &serde_json::Value) -> Result<AgentDecision, RunnerError> {
    match tool.to_lowercase().as_str() {
        "update_focus" | "updatefocus" => {
            let focus = params
                .get("focus")
                .and_then(serde_json::Value::as_str)
                .and_then(parse_focus);
            let strategy = params
                .get("strategy")
                .and_then(serde_json::Value::as_str)
                .and_then(parse_strategy);
            let target_zone = params
                .get("targetZone")
                .or_else(|| params.get("target_zone"))
                .and_then(serde_json::Value::as_str)
                .and_then(|s| uuid::Uuid::parse_str(s).ok())
                .map(ZoneId::from);

            Ok(AgentDecision::UpdateFocus {
                focus,
                strategy,
                target_zone,
            })
        }
        "take_action" | "takeaction" => {
            let action_str = params
                .get("action")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| {
                    RunnerError::Parse("take_action requires an 'action' parameter".to_owned())
                })?;
            let action_type = parse_action_type(action_str)?;

            let profession = params
                .get("professionId")
                .or_else(|| params.get("profession"))
                .and_then(serde_json::Value::as_str)
                .and_then(parse_profession);

            Ok(AgentDecision::TakeAction {
                action_type,
                profession,
            })
        }
        other => Err(RunnerError::Parse(format!("unknown tool: {other}"))),
    }
}

fn parse_focus(s: &str) -> Option<AgentFocus> {
    let quoted = format!("\"{s}\"");
    if let Ok(f) = serde_json::from_str::<AgentFocus>(&quoted) {
        return Some(f);
    }
    match s.to_lowercase().as_str() {
        "questing" => Some(AgentFocus::Questing),
        "combat" => Some(AgentFocus::Combat),
        "enchanting" => Some(AgentFocus::Enchanting),
        "crafting" => Some(AgentFocus::Crafting),
        "gathering" => Some(AgentFocus::Gathering),
        "alchemy" => Some(AgentFocus::Alchemy),
        "cooking" => Some(AgentFocus::Cooking),
        "trading" => Some(AgentFocus::Trading),
        "idle" => Some(AgentFocus::Idle),
        _ => None,
    }
}

fn parse_strategy(s: &str) -> Option<AgentStrategy> {
    let quoted = format!("\"{s}\"");
    if let Ok(st) = serde_json::from_str::<AgentStrategy>(&quoted) {
        return Some(st);
    }
    match s.to_lowercase().as_str() {
        "aggressive" => Some(AgentStrategy::Aggressive),
        "balanced" => Some(AgentStrategy::Balanced),
        "defensive" => Some(AgentStrategy::Defensive),
        _ => None,
    }
}

fn parse_profession(s: &str) -> Option<Profession> {
    let quoted = format!("\"{s}\"");
    if let Ok(p) = serde_json::from_str::<Profession>(&quoted) {
        return Some(p);
    }
    match s.to_lowercase().as_str() {
        "mining" => Some(Profession::Mining),
        "herbalism" => Some(Profession::Herbalism),
        "skinning" => Some(Profession::Skinning),
        "alchemy" => Some(Profession::Alchemy),
        "cooking" => Some(Profession::Cooking),
        "forging" => Some(Profession::Forging),
        "leatherworking" => Some(Profession::Leatherworking),
        "jewelcrafting" => Some(Profession::Jewelcrafting),
        _ => None,
    }
}

/// Parse a string action type into the typed enum.
fn parse_action_type(s: &str) -> Result<ActionType, RunnerError> {
    let quoted = format!("\"{s}\"");
    if let Ok(at) = serde_json::from_str::<ActionType>(&quoted) {
        return Ok(at);
    }

    match s.to_lowercase().as_str() {
        "move" => Ok(ActionType::Move),
        "attack" => Ok(ActionType::Attack),
        "usetechnique" | "use_technique" => Ok(ActionType::UseTechnique),
        "gather" => Ok(ActionType::Gather),
        "craft" => Ok(ActionType::Craft),
        "equip" => Ok(ActionType::Equip),
        "unequip" => Ok(ActionType::Unequip),
        "repair" => Ok(ActionType::Repair),
        "buy" => Ok(ActionType::Buy),
        "sell" => Ok(ActionType::Sell),
        "tradeoffer" | "trade_offer" => Ok(ActionType::TradeOffer),
        "tradeaccept" | "trade_accept" => Ok(ActionType::TradeAccept),
        "tradereject" | "trade_reject" => Ok(ActionType::TradeReject),
        "partyform" | "party_form" => Ok(ActionType::PartyForm),
        "partyleave" | "party_leave" => Ok(ActionType::PartyLeave),
        "questaccept" | "quest_accept" => Ok(ActionType::QuestAccept),
        "questcomplete" | "quest_complete" => Ok(ActionType::QuestComplete),
        other => Err(RunnerError::Parse(format!("unknown action type: {other}"))),
    }
}

/// Extract JSON from a markdown code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let start = text
        .find("```json")
        .map(|i| {
            let after_tag = i.checked_add(7).unwrap_or(i);
            text.get(after_tag..)
                .and_then(|s| s.find('\n'))
                .and_then(|nl| after_tag.checked_add(nl))
                .and_then(|pos| pos.checked_add(1))
                .unwrap_or(after_tag)
        })
        .or_else(|| {
            text.find("```").map(|i| {
                let after_tag = i.checked_add(3).unwrap_or(i);
                text.get(after_tag..)
                    .and_then(|s| s.find('\n'))
                    .and_then(|nl| after_tag.checked_add(nl))
                    .and_then(|pos| pos.checked_add(1))
                    .unwrap_or(after_tag)
            })
        });

    let start = start?;
    let remaining = text.get(start..)?;
    let end = remaining.find("```")?;
    remaining.get(..end).map(str::trim)
}

/// Strip trailing commas before closing braces and brackets (common LLM error).
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut i = 0;
    while i < len {
        let c = chars.get(i).copied().unwrap_or(' ');
        if c == ',' {
            let mut j = i.checked_add(1).unwrap_or(i);
            while j < len && chars.get(j).copied().unwrap_or(' ').is_whitespace() {
                j = j.checked_add(1).unwrap_or(j);
            }
            let next = chars.get(j).copied().unwrap_or(' ');
            if next == '}' || next == ']' {
                i = i.checked_add(1).unwrap_or(i);
                continue;
            }
        }
        result.push(c);
        i = i.checked_add(1).unwrap_or(len);
    }

    result
}

/// A decision-less parse result, used when every recovery strategy fails.
fn no_decision() -> ParsedDecision {
    ParsedDecision {
        decision: None,
        reasoning: Some("failed to parse LLM response".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_take_action_gather() {
        let raw = r#"{"tool": "take_action", "parameters": {"action": "Gather"}, "reasoning": "need ore"}"#;
        let decision = parse_llm_response(raw);
        assert!(matches!(
            decision.decision,
            Some(AgentDecision::TakeAction {
                action_type: ActionType::Gather,
                ..
            })
        ));
        assert_eq!(decision.reasoning.as_deref(), Some("need ore"));
    }

    #[test]
    fn parse_valid_update_focus() {
        let raw = r#"{"tool": "update_focus", "parameters": {"focus": "Combat", "strategy": "Aggressive"}}"#;
        let decision = parse_llm_response(raw);
        match decision.decision {
            Some(AgentDecision::UpdateFocus { focus, strategy, .. }) => {
                assert_eq!(focus, Some(AgentFocus::Combat));
                assert_eq!(strategy, Some(AgentStrategy::Aggressive));
            }
            other => panic!("expected UpdateFocus, got {other:?}"),
        }
    }

    #[test]
    fn parse_case_insensitive_action() {
        let raw = r#"{"tool": "take_action", "parameters": {"action": "craft"}}"#;
        let decision = parse_llm_response(raw);
        assert!(matches!(
            decision.decision,
            Some(AgentDecision::TakeAction {
                action_type: ActionType::Craft,
                ..
            })
        ));
    }

    #[test]
    fn parse_from_codeblock() {
        let raw = "Here is my decision:\n\n```json\n{\"tool\": \"take_action\", \"parameters\": {\"action\": \"Attack\"}}\n```\n";
        let decision = parse_llm_response(raw);
        assert!(matches!(
            decision.decision,
            Some(AgentDecision::TakeAction {
                action_type: ActionType::Attack,
                ..
            })
        ));
    }

    #[test]
    fn parse_trailing_comma() {
        let raw = r#"{"tool": "take_action", "parameters": {"action": "Gather"}, "reasoning": "ok",}"#;
        let decision = parse_llm_response(raw);
        assert!(decision.decision.is_some());
    }

    #[test]
    fn parse_garbage_returns_no_decision() {
        let raw = "I think I should gather some ore. Let me do that.";
        let decision = parse_llm_response(raw);
        assert!(decision.decision.is_none());
    }

    #[test]
    fn parse_empty_returns_no_decision() {
        let decision = parse_llm_response("");
        assert!(decision.decision.is_none());
    }

    #[test]
    fn parse_unknown_tool_returns_no_decision() {
        let raw = r#"{"tool": "cast_spell", "parameters": {}}"#;
        let decision = parse_llm_response(raw);
        assert!(decision.decision.is_none());
    }

    #[test]
    fn extract_json_from_markdown() {
        let text = "```json\n{\"key\": \"value\"}\n```";
        let result = extract_json_from_codeblock(text);
        assert_eq!(result, Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn strip_trailing_commas_basic() {
        let input = r#"{"a": 1, "b": 2,}"#;
        let result = strip_trailing_commas(input);
        assert_eq!(result, r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn parse_snake_case_action_and_profession() {
        let raw = r#"{"tool": "take_action", "parameters": {"action": "trade_offer"}}"#;
        let decision = parse_llm_response(raw);
        assert!(matches!(
            decision.decision,
            Some(AgentDecision::TakeAction {
                action_type: ActionType::TradeOffer,
                ..
            })
        ));

        let raw2 = r#"{"tool": "take_action", "parameters": {"action": "Gather", "professionId": "mining"}}"#;
        let decision2 = parse_llm_response(raw2);
        match decision2.decision {
            Some(AgentDecision::TakeAction { profession, .. }) => {
                assert_eq!(profession, Some(Profession::Mining));
            }
            other => panic!("expected TakeAction, got {other:?}"),
        }
    }
}
