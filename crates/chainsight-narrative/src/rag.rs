use chainsight_core::{DataTable, Warehouse};

use crate::service::NarrativeService;

const CONTEXT_EXCERPT_CHARS: usize = 500;

/// Search quarterly business review documents for a term. Search failures
/// degrade to an empty table; the narrative layer treats "no documents" and
/// "search broken" the same way.
pub async fn search_qbr_documents(
    warehouse: &dyn Warehouse,
    query: &str,
    limit: usize,
) -> DataTable {
    let escaped = query.replace('\'', "''");
    let sql = format!(
        "SELECT doc_name, quarter, year, content_text \
         FROM raw.qbr_documents \
         WHERE LOWER(content_text) LIKE '%' || LOWER('{escaped}') || '%' \
         OR LOWER(doc_name) LIKE '%' || LOWER('{escaped}') || '%' \
         LIMIT {limit}"
    );

    match warehouse.execute(&sql).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("QBR document search failed: {}", e);
            DataTable::empty()
        }
    }
}

/// Build the grounded prompt from retrieved document excerpts.
pub fn build_rag_prompt(question: &str, documents: &DataTable) -> String {
    let context_text = (0..documents.num_rows())
        .map(|row| {
            let doc_name = text_cell(documents, row, "doc_name").unwrap_or_else(|| "Unknown".to_string());
            let quarter = text_cell(documents, row, "quarter").unwrap_or_default();
            let year = documents
                .value(row, "year")
                .filter(|v| !v.is_null())
                .map(|v| v.to_string())
                .unwrap_or_default();
            let content = text_cell(documents, row, "content_text").unwrap_or_default();
            let excerpt: String = content.chars().take(CONTEXT_EXCERPT_CHARS).collect();

            format!("From {} ({} {}):\n{}...", doc_name, quarter, year, excerpt)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Based on the following quarterly business review excerpts, answer this question concisely:

Question: {question}

Context:
{context_text}

Provide a brief answer citing specific documents. No preamble."#
    )
}

/// Answer a question grounded in QBR documents. Never raises: missing
/// documents and completion failures both come back as plain text.
pub async fn generate_rag_response(
    service: &dyn NarrativeService,
    warehouse: &dyn Warehouse,
    question: &str,
) -> String {
    let documents = search_qbr_documents(warehouse, question, 3).await;

    if documents.is_empty() {
        return "No relevant documents found for your query.".to_string();
    }

    let prompt = build_rag_prompt(question, &documents);

    match service.complete(&prompt).await {
        Ok(response) => response,
        Err(e) => format!("Unable to generate response: {}", e),
    }
}

fn text_cell(table: &DataTable, row: usize, column: &str) -> Option<String> {
    table
        .value(row, column)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
