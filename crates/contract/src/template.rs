use thiserror::Error;

use crate::client::Client;
use crate::settings::ContractSettings;

/// Placeholder rendered when an optional client field was left empty.
pub const MISSING_FIELD: &str = "[Não informado]";

/// Tokens recognised inside clause templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    ClientName,
    ClientDocument,
    ClientEmail,
    ClientPhone,
    ProjectName,
    ProjectDescription,
    StartDate,
    EndDate,
    SetupFee,
    MonthlyFee,
    DueDay,
    PaymentMethod,
    ProviderName,
    ProviderDocument,
    ProviderCityState,
    ProviderEmail,
    ContractNumber,
    IssueDate,
}

impl Token {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "client_name" => Token::ClientName,
            "client_document" => Token::ClientDocument,
            "client_email" => Token::ClientEmail,
            "client_phone" => Token::ClientPhone,
            "project_name" => Token::ProjectName,
            "project_description" => Token::ProjectDescription,
            "start_date" => Token::StartDate,
            "end_date" => Token::EndDate,
            "setup_fee" => Token::SetupFee,
            "monthly_fee" => Token::MonthlyFee,
            "due_day" => Token::DueDay,
            "payment_method" => Token::PaymentMethod,
            "provider_name" => Token::ProviderName,
            "provider_document" => Token::ProviderDocument,
            "provider_city_state" => Token::ProviderCityState,
            "provider_email" => Token::ProviderEmail,
            "contract_number" => Token::ContractNumber,
            "issue_date" => Token::IssueDate,
            _ => return None,
        })
    }

    fn resolve(self, context: &ContractContext<'_>) -> String {
        let client = context.client;
        let settings = context.settings;
        match self {
            Token::ClientName => client.name.clone(),
            Token::ClientDocument => or_missing(client.document.as_deref()).to_string(),
            Token::ClientEmail => client.email.clone(),
            Token::ClientPhone => or_missing(client.phone.as_deref()).to_string(),
            Token::ProjectName => client.project_name.clone(),
            Token::ProjectDescription => client
                .project_description
                .as_deref()
                .filter(|text| !text.is_empty())
                .unwrap_or("A ser alinhado entre as partes.")
                .to_string(),
            Token::StartDate => client.start_date.clone(),
            Token::EndDate => client.end_date.clone(),
            Token::SetupFee => format!("{:.2}", client.setup_fee),
            Token::MonthlyFee => format!("{:.2}", client.monthly_fee),
            Token::DueDay => client.due_day.to_string(),
            Token::PaymentMethod => client.payment_method.label().to_string(),
            Token::ProviderName => non_empty_or(&settings.provider_name, "[Seu Nome]"),
            Token::ProviderDocument => or_missing(Some(&settings.provider_document)).to_string(),
            Token::ProviderCityState => {
                non_empty_or(&settings.provider_city_state, "[Sua Cidade]")
            }
            Token::ProviderEmail => settings.provider_email.clone(),
            Token::ContractNumber => context.contract_number.to_string(),
            Token::IssueDate => context.issue_date.to_string(),
        }
    }
}

fn or_missing(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => MISSING_FIELD,
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Parsed clause template segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    Literal(String),
    Token(Token),
}

/// A clause body with `{token}` placeholders. `{{` renders a literal brace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClauseTemplate {
    pub segments: Vec<TemplateSegment>,
}

/// Errors raised while parsing clause templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown contract token '{{{0}}}'")]
    UnknownToken(String),
    #[error("unterminated token starting at byte {0}")]
    UnterminatedToken(usize),
}

impl ClauseTemplate {
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut buffer = String::new();
        let mut chars = input.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            if ch == '}' {
                // `}}` collapses to a literal brace, mirroring `{{`.
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                buffer.push('}');
                continue;
            }
            if ch != '{' {
                buffer.push(ch);
                continue;
            }
            if let Some((_, '{')) = chars.peek() {
                buffer.push('{');
                chars.next();
                continue;
            }

            let mut name = String::new();
            let mut closed = false;
            for (_, inner) in chars.by_ref() {
                if inner == '}' {
                    closed = true;
                    break;
                }
                name.push(inner);
            }
            if !closed {
                return Err(TemplateError::UnterminatedToken(idx));
            }
            let token = Token::from_name(name.trim())
                .ok_or_else(|| TemplateError::UnknownToken(name.trim().to_string()))?;
            if !buffer.is_empty() {
                segments.push(TemplateSegment::Literal(std::mem::take(&mut buffer)));
            }
            segments.push(TemplateSegment::Token(token));
        }

        if !buffer.is_empty() {
            segments.push(TemplateSegment::Literal(buffer));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, context: &ContractContext<'_>) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => output.push_str(text),
                TemplateSegment::Token(token) => output.push_str(&token.resolve(context)),
            }
        }
        output
    }
}

/// Values available to clause templates while composing one contract.
#[derive(Debug, Clone)]
pub struct ContractContext<'a> {
    pub client: &'a Client,
    pub settings: &'a ContractSettings,
    pub contract_number: &'a str,
    pub issue_date: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PaymentMethod;

    fn sample_client() -> Client {
        Client {
            id: "ab12cd34".into(),
            name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            phone: None,
            document: Some("123.456.789-00".into()),
            project_name: "Site institucional".into(),
            project_description: None,
            start_date: "01/02/2025".into(),
            end_date: "30/04/2025".into(),
            setup_fee: 3500.0,
            monthly_fee: 250.5,
            due_day: 10,
            payment_method: PaymentMethod::Pix,
            contract_signed: false,
        }
    }

    fn render(input: &str) -> String {
        let client = sample_client();
        let settings = ContractSettings::default();
        let context = ContractContext {
            client: &client,
            settings: &settings,
            contract_number: "#2025-AB12",
            issue_date: "01/07/2025",
        };
        ClauseTemplate::parse(input).unwrap().render(&context)
    }

    #[test]
    fn interpolates_client_fields() {
        assert_eq!(
            render("CONTRATANTE: {client_name}, CPF/CNPJ nº {client_document}."),
            "CONTRATANTE: Ana Souza, CPF/CNPJ nº 123.456.789-00."
        );
    }

    #[test]
    fn missing_optionals_use_the_placeholder() {
        assert_eq!(render("telefone {client_phone}"), "telefone [Não informado]");
    }

    #[test]
    fn fees_render_with_two_decimals() {
        assert_eq!(
            render("R$ {setup_fee} / R$ {monthly_fee}"),
            "R$ 3500.00 / R$ 250.50"
        );
    }

    #[test]
    fn empty_description_gets_the_default_wording() {
        assert_eq!(
            render("{project_description}"),
            "A ser alinhado entre as partes."
        );
    }

    #[test]
    fn doubled_brace_is_literal() {
        assert_eq!(render("{{client_name}}"), "{client_name}");
    }

    #[test]
    fn unknown_token_is_rejected() {
        match ClauseTemplate::parse("dia {vencimento}") {
            Err(TemplateError::UnknownToken(name)) => assert_eq!(name, "vencimento"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unterminated_token_is_rejected() {
        match ClauseTemplate::parse("dia {due_day") {
            Err(TemplateError::UnterminatedToken(4)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
