use serde::{Deserialize, Serialize};

/// Payment rails offered to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "boleto")]
    Boleto,
    #[serde(rename = "transferencia")]
    BankTransfer,
    #[serde(rename = "cartao")]
    CreditCard,
}

impl PaymentMethod {
    /// Human-readable label used inside contract clauses.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Boleto => "Boleto Bancário",
            PaymentMethod::BankTransfer => "Transferência Bancária",
            PaymentMethod::CreditCard => "Cartão de Crédito",
        }
    }
}

/// One client row as synchronised with the remote backend.
///
/// Dates are kept as pre-formatted strings; formatting and locale concerns
/// live upstream, the contract layer only interpolates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// CPF/CNPJ.
    pub document: Option<String>,
    pub project_name: String,
    pub project_description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub setup_fee: f64,
    pub monthly_fee: f64,
    /// Day of month (1-31) the recurring fee falls due.
    pub due_day: u8,
    pub payment_method: PaymentMethod,
    pub contract_signed: bool,
}

impl Client {
    /// Short contract number shown on the document:
    /// `#<year>-<first four id characters, uppercased>`.
    pub fn contract_number(&self, year: u16) -> String {
        let prefix: String = self
            .id
            .chars()
            .take(4)
            .flat_map(char::to_uppercase)
            .collect();
        format!("#{year}-{prefix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> Client {
        Client {
            id: "ab12cd34".into(),
            name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            phone: None,
            document: Some("123.456.789-00".into()),
            project_name: "Site institucional".into(),
            project_description: None,
            start_date: "2025-02-01".into(),
            end_date: "2025-04-30".into(),
            setup_fee: 3500.0,
            monthly_fee: 250.0,
            due_day: 10,
            payment_method: PaymentMethod::Pix,
            contract_signed: false,
        }
    }

    #[test]
    fn contract_number_uses_id_prefix() {
        assert_eq!(sample_client().contract_number(2025), "#2025-AB12");
    }

    #[test]
    fn contract_number_handles_short_ids() {
        let mut client = sample_client();
        client.id = "x9".into();
        assert_eq!(client.contract_number(2026), "#2026-X9");
    }

    #[test]
    fn payment_labels_match_contract_wording() {
        assert_eq!(PaymentMethod::Boleto.label(), "Boleto Bancário");
        assert_eq!(PaymentMethod::CreditCard.label(), "Cartão de Crédito");
    }
}
