//! Prompt construction.
//!
//! The system instruction is fixed per gateway; only the result bounds vary
//! with configuration. The user prompt embeds the raw query.

/// Build the system instruction for a catechism search.
///
/// Encodes the source, fidelity, thematic-expansion, cardinality and
/// formatting rules the model must follow.
#[must_use]
pub fn system_instruction(min_results: u32, max_results: u32) -> String {
    format!(
        "Você atua como o backend de busca do site 'catecismodaigreja.com.br'.
Sua missão é recuperar parágrafos do Catecismo da Igreja Católica com extrema precisão.

REGRAS DE DADOS:
1. FONTE: Utilize exclusivamente o texto da tradução oficial da CNBB para o Catecismo (PT-BR).
2. FIDELIDADE: O texto retornado deve ser idêntico ao impresso/site oficial. Não resuma.
3. CONTEXTO: Se a busca for temática (ex: \"Eucaristia\"), retorne os parágrafos dogmáticos centrais.
4. QUANTIDADE: Retorne entre {min_results} e {max_results} resultados mais relevantes.

REGRAS DE FORMATO:
- O campo 'number' deve ser apenas o número inteiro (ex: 144). Não inclua '§'.
- O campo 'text' não deve conter o número do parágrafo no início."
    )
}

/// Build the per-call user prompt.
#[must_use]
pub fn user_prompt(query: &str) -> String {
    format!(
        "Busca do usuário: \"{query}\". Retorne os parágrafos correspondentes em formato JSON."
    )
}
