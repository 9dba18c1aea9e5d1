//! Prompt templates for the quotation agent

use crate::types::Prompt;

/// A tool the agent prompt advertises to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Template variant selected by the caller
#[derive(Debug, Clone, Copy)]
pub enum PromptMode<'a> {
    /// Single grounded answer over the retrieved context
    Direct,
    /// ReAct template; `scratchpad` holds the previous Thought/Action/Observation turns
    Agent {
        tools: &'a [ToolSpec],
        scratchpad: &'a str,
    },
}

/// Prompt builder carrying the agent persona
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    agent_name: String,
}

impl PromptBuilder {
    /// Create a builder for the named agent
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
        }
    }

    /// Agent name used in the persona
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Fixed persona instruction
    pub fn persona(&self) -> String {
        format!(
            "You are {name}, a concise hotel and tourism expert for Sri Lanka. \
             Answer the user's question using only the provided context from hotel documents. \
             If the information isn't available in the context, say so briefly and use general knowledge only as fallback. \
             Be concise and professional.",
            name = self.agent_name
        )
    }

    /// Render the prompt for `mode`
    pub fn build(&self, query: &str, context: &str, mode: PromptMode<'_>) -> Prompt {
        match mode {
            PromptMode::Direct => self.direct(query, context),
            PromptMode::Agent { tools, scratchpad } => self.agent(query, tools, scratchpad),
        }
    }

    /// Build the direct RAG prompt
    pub fn direct(&self, query: &str, context: &str) -> Prompt {
        Prompt::new(format!(
            "{persona}\n\nContext:\n{context}\n\nQuestion: {question}\n\nAnswer:",
            persona = self.persona(),
            context = context,
            question = query
        ))
    }

    /// Build the ReAct prompt
    pub fn agent(&self, query: &str, tools: &[ToolSpec], scratchpad: &str) -> Prompt {
        let tool_list = tools
            .iter()
            .map(|t| format!("{}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Prompt::new(format!(
            r#"{persona}

You have access to the following tools:

{tool_list}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

If you do not need a tool to answer, respond with only a single line starting with "Final Answer:" and do not write any Action or Action Input lines.

Begin!

Question: {question}
Thought:{scratchpad}"#,
            persona = self.persona(),
            tool_list = tool_list,
            tool_names = tool_names,
            question = query,
            scratchpad = scratchpad
        ))
    }
}
