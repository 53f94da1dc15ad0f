//! Task handling for each assistant variant.

use concierge_core::data_source::DataSource;
use concierge_core::error::{AssistantError, Result};
use concierge_core::llm::Llm;
use concierge_core::message::{Message, RequestBody};
use tracing::{debug, info, warn};

use crate::assistant::{Assistant, AssistantKind};
use crate::prompt::build_data_source_description_messages;

/// Attempts the SQL assistant makes to get a well-formed query.
pub const SQL_MAX_ATTEMPTS: usize = 3;

const CSV_INSTRUCTIONS: &str = "You are a data analyst working with CSV files. Work out which \
columns the question refers to, describe the calculation you perform, and give the final answer \
clearly. If the files do not contain what is needed, say so.";

const SQL_INSTRUCTIONS: &str = "You are an AI skilled in SQL. Generate a query based on the given \
schema and user request. Provide all SQL queries in markdown.";

impl Assistant {
    /// Run this assistant on a request and return its answer.
    pub async fn handle(
        &self,
        llm: &dyn Llm,
        body: &RequestBody,
        data_sources: &[DataSource],
    ) -> Result<String> {
        debug!(assistant = %self.name, data_sources = data_sources.len(), "Handling request");

        match &self.kind {
            AssistantKind::Default => Ok(llm.prompt(body, data_sources).await?),
            AssistantKind::Csv => {
                let body = body.with_leading(Message::system(CSV_INSTRUCTIONS));
                Ok(llm.prompt(&body, data_sources).await?)
            }
            AssistantKind::Sql => self.generate_sql_query(llm, body, data_sources).await,
            AssistantKind::Custom(custom) => match &custom.instructions {
                Some(instructions) => {
                    let body = body.with_leading(Message::system(instructions));
                    Ok(llm.prompt(&body, data_sources).await?)
                }
                None => Ok(llm.prompt(body, data_sources).await?),
            },
        }
    }

    /// Ask for a query over the attached databases and extract it from the
    /// reply. Replies without a fenced query are retried.
    async fn generate_sql_query(
        &self,
        llm: &dyn Llm,
        body: &RequestBody,
        data_sources: &[DataSource],
    ) -> Result<String> {
        let schema = build_data_source_description_messages(data_sources);
        let request = RequestBody {
            messages: vec![
                Message::system(SQL_INSTRUCTIONS),
                Message::user(format!(
                    "Given the database schema:\n\n{schema}\n\nGenerate a SQL query for:\n\n{}",
                    body.last_message_content()
                )),
            ],
            model: body.model.clone(),
        };

        let mut last_failure = String::new();
        for attempt in 1..=SQL_MAX_ATTEMPTS {
            // The schema is already in the prompt.
            let reply = llm.prompt(&request, &[]).await?;
            match extract_sql_query(&self.name, &reply) {
                Ok(query) => {
                    info!(attempt, "Generated SQL query");
                    return Ok(query);
                }
                Err(e) => {
                    warn!(attempt, max = SQL_MAX_ATTEMPTS, error = %e, "SQL generation attempt failed");
                    last_failure = e.to_string();
                }
            }
        }

        Err(AssistantError::ExecutionFailed {
            assistant: self.name.clone(),
            attempts: SQL_MAX_ATTEMPTS,
            reason: last_failure,
        }
        .into())
    }
}

/// The query inside the first ```` ```sql ```` fence of `reply`, trimmed.
pub fn extract_sql_query(assistant: &str, reply: &str) -> std::result::Result<String, AssistantError> {
    const OPEN: &str = "```sql";
    const CLOSE: &str = "```";

    let start = reply.find(OPEN).ok_or_else(|| AssistantError::InvalidOutput {
        assistant: assistant.to_string(),
        reason: "no opening ```sql fence".into(),
    })? + OPEN.len();

    let rest = &reply[start..];
    let end = rest.find(CLOSE).ok_or_else(|| AssistantError::InvalidOutput {
        assistant: assistant.to_string(),
        reason: "no closing ``` fence".into(),
    })?;

    Ok(rest[..end].trim().to_string())
}
