//! Prompt template loading and rendering via `minijinja`.
//!
//! Templates are loaded from the filesystem (default: `templates/` directory)
//! so operators can tune agent behavior without recompiling. The template
//! engine renders an [`shard_types::AgentPerception`] snapshot, serialized to
//! JSON, into a structured LLM prompt describing identity, surroundings, and
//! the `update_focus`/`take_action` tool schema.

use minijinja::Environment;

use crate::error::RunnerError;

/// Manages prompt template loading and rendering.
///
/// Wraps a `minijinja` [`Environment`] with all agent prompt templates
/// pre-loaded. Templates can be edited on disk and will be picked up on
/// the next call to [`PromptEngine::new`].
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the agent's role and the decision schema.
    pub system: String,
    /// User message containing identity, perception, and chat memory.
    pub user: String,
}

impl PromptEngine {
    /// Create a new prompt engine loading templates from the given directory.
    ///
    /// The directory must contain: `system.j2`, `identity.j2`,
    /// `perception.j2`, `memory.j2`, `actions.j2`.
    pub fn new(templates_dir: &str) -> Result<Self, RunnerError> {
        let mut env = Environment::new();

        let system_tpl = load_template(templates_dir, "system.j2")?;
        let identity_tpl = load_template(templates_dir, "identity.j2")?;
        let perception_tpl = load_template(templates_dir, "perception.j2")?;
        let memory_tpl = load_template(templates_dir, "memory.j2")?;
        let actions_tpl = load_template(templates_dir, "actions.j2")?;

        env.add_template_owned("system", system_tpl)
            .map_err(|e| RunnerError::Template(format!("failed to add system template: {e}")))?;
        env.add_template_owned("identity", identity_tpl)
            .map_err(|e| RunnerError::Template(format!("failed to add identity template: {e}")))?;
        env.add_template_owned("perception", perception_tpl).map_err(|e| {
            RunnerError::Template(format!("failed to add perception template: {e}"))
        })?;
        env.add_template_owned("memory", memory_tpl)
            .map_err(|e| RunnerError::Template(format!("failed to add memory template: {e}")))?;
        env.add_template_owned("actions", actions_tpl)
            .map_err(|e| RunnerError::Template(format!("failed to add actions template: {e}")))?;

        Ok(Self { env })
    }

    /// Render the full prompt for an agent's decision.
    ///
    /// Takes the combined perception/focus/chat context serialized as a
    /// `serde_json::Value` and produces a [`RenderedPrompt`] with system and
    /// user messages.
    pub fn render(&self, context: &serde_json::Value) -> Result<RenderedPrompt, RunnerError> {
        let system = self
            .env
            .get_template("system")
            .map_err(|e| RunnerError::Template(format!("missing system template: {e}")))?
            .render(context)
            .map_err(|e| RunnerError::Template(format!("system render failed: {e}")))?;

        let identity = self
            .env
            .get_template("identity")
            .map_err(|e| RunnerError::Template(format!("missing identity template: {e}")))?
            .render(context)
            .map_err(|e| RunnerError::Template(format!("identity render failed: {e}")))?;

        let perception_text = self
            .env
            .get_template("perception")
            .map_err(|e| RunnerError::Template(format!("missing perception template: {e}")))?
            .render(context)
            .map_err(|e| RunnerError::Template(format!("perception render failed: {e}")))?;

        let memory = self
            .env
            .get_template("memory")
            .map_err(|e| RunnerError::Template(format!("missing memory template: {e}")))?
            .render(context)
            .map_err(|e| RunnerError::Template(format!("memory render failed: {e}")))?;

        let actions = self
            .env
            .get_template("actions")
            .map_err(|e| RunnerError::Template(format!("missing actions template: {e}")))?
            .render(context)
            .map_err(|e| RunnerError::Template(format!("actions render failed: {e}")))?;

        let user = format!("{identity}\n\n{perception_text}\n\n{memory}\n\n{actions}");

        Ok(RenderedPrompt { system, user })
    }
}

/// Read a template file from disk.
fn load_template(dir: &str, filename: &str) -> Result<String, RunnerError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| RunnerError::Template(format!("failed to read {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_templates(dir: &std::path::Path) {
        std::fs::write(
            dir.join("system.j2"),
            "You are {{ self_state.name }}, a character in a persistent game world. \
             Respond only by calling update_focus or take_action.",
        )
        .ok();
        std::fs::write(
            dir.join("identity.j2"),
            "## Identity\nName: {{ self_state.name }}\nLevel: {{ self_state.level }}",
        )
        .ok();
        std::fs::write(
            dir.join("perception.j2"),
            "## Perception\nTick: {{ tick }}\nZone: {{ zone_id }}\nHP: {{ self_state.hp }}/{{ self_state.max_hp }}",
        )
        .ok();
        std::fs::write(
            dir.join("memory.j2"),
            "## Recent chat\n{% for turn in chat_history %}- {{ turn.role }}: {{ turn.content }}\n{% endfor %}",
        )
        .ok();
        std::fs::write(
            dir.join("actions.j2"),
            "## Available tools\nupdate_focus(focus, strategy?, targetZone?)\n\
             take_action(action, professionId?)\n\n\
             Respond with JSON: {\"tool\": \"...\", \"parameters\": {...}}",
        )
        .ok();
    }

    #[test]
    fn template_loading_and_rendering() {
        let unique = format!(
            "shard_agent_runner_test_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        write_test_templates(&dir);

        let engine = PromptEngine::new(dir.to_str().unwrap_or(""));
        assert!(engine.is_ok(), "PromptEngine::new should succeed with valid templates");

        let engine = match engine {
            Ok(e) => e,
            Err(_) => return,
        };

        let context = serde_json::json!({
            "tick": 42,
            "zone_id": "01945c2a-3b4f-7def-8a12-bc34567890ab",
            "self_state": {
                "name": "Brannor",
                "level": 12,
                "hp": 80,
                "max_hp": 100
            },
            "chat_history": [
                {"role": "user", "content": "go kill some wolves"}
            ]
        });

        let result = engine.render(&context);
        assert!(result.is_ok(), "render should succeed with valid context data");

        let prompt = match result {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(
            prompt.system.contains("Brannor"),
            "system prompt should contain agent name"
        );
        assert!(
            prompt.user.contains("Tick: 42"),
            "user prompt should contain tick number"
        );
        assert!(
            prompt.user.contains("take_action"),
            "user prompt should describe available tools"
        );
        assert!(
            prompt.user.contains("kill some wolves"),
            "user prompt should contain chat memory"
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_template_returns_error() {
        let unique = format!(
            "shard_agent_runner_missing_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("system.j2"), "test").ok();

        let result = PromptEngine::new(dir.to_str().unwrap_or(""));
        assert!(result.is_err(), "should fail when templates are missing");

        std::fs::remove_dir_all(&dir).ok();
    }
}
