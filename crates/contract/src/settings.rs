use std::fmt;

use serde::{Deserialize, Serialize};

/// RGBA colour parsed from `#rrggbb` / `#rrggbbaa` settings values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHashPrefix)?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength);
        }
        let mut rgba = [0u8; 4];
        for i in 0..(hex.len() / 2) {
            let start = i * 2;
            let value = u8::from_str_radix(&hex[start..start + 2], 16)
                .map_err(|_| ColorParseError::InvalidHex)?;
            rgba[i] = value;
        }
        if hex.len() == 6 {
            rgba[3] = 255;
        }
        Ok(Color {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        })
    }

    pub const fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    MissingHashPrefix,
    InvalidLength,
    InvalidHex,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::MissingHashPrefix => write!(f, "missing leading '#'"),
            ColorParseError::InvalidLength => write!(f, "expected 6 or 8 hexadecimal digits"),
            ColorParseError::InvalidHex => write!(f, "contains non-hexadecimal digits"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Provider-side settings applied to every generated contract.
/// 套用於所有產出合約的服務提供者設定。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractSettings {
    pub provider_name: String,
    /// Provider CPF/CNPJ.
    pub provider_document: String,
    pub provider_city_state: String,
    pub provider_email: String,
    /// Accent colour for headings, as a hex string.
    pub primary_color: String,
    pub clause5_text: String,
    pub clause6_text: String,
    pub clause7_text: String,
    pub custom_footer: String,
    pub include_witnesses: bool,
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self {
            provider_name: String::new(),
            provider_document: String::new(),
            provider_city_state: String::new(),
            provider_email: String::new(),
            primary_color: "#7C3AED".into(),
            clause5_text: "O(A) CONTRATADO(A) compromete-se a executar os serviços descritos \
                           neste contrato com qualidade, dentro do prazo acordado e em \
                           conformidade com as boas práticas da área, mantendo o CONTRATANTE \
                           informado sobre o andamento do trabalho."
                .into(),
            clause6_text: "O CONTRATANTE compromete-se a efetuar os pagamentos nas datas \
                           acordadas, fornecer ao CONTRATADO(A) todos os materiais, acessos e \
                           informações necessários para a execução do serviço, e respeitar os \
                           prazos de entrega definidos neste instrumento."
                .into(),
            clause7_text: "O presente contrato poderá ser rescindido por qualquer das partes \
                           mediante notificação prévia de 15 (quinze) dias, ficando a parte \
                           rescindente responsável pelo pagamento dos valores proporcionais aos \
                           serviços já prestados até a data da rescisão."
                .into(),
            custom_footer: "Documento gerado eletronicamente".into(),
            include_witnesses: false,
        }
    }
}

impl ContractSettings {
    /// Parsed accent colour, falling back to black like the on-screen
    /// template does for unset values.
    pub fn accent_color(&self) -> Color {
        Color::from_hex(&self.primary_color).unwrap_or(Color::BLACK)
    }

    /// City portion of `provider_city_state` ("Campinas - SP" → "Campinas").
    pub fn provider_city(&self) -> &str {
        self.provider_city_state
            .split('-')
            .next()
            .unwrap_or("")
            .trim()
    }
}
