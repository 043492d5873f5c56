use crate::client::Client;
use crate::settings::ContractSettings;
use crate::template::{ClauseTemplate, ContractContext, TemplateError};

/// One signature slot at the foot of the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signatory {
    pub role: String,
    pub name: String,
    pub document_line: String,
}

/// Block-level elements of a composed contract, in reading order.
/// 組成合約的區塊元素，依閱讀順序排列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    ClauseHeading(String),
    Paragraph(String),
    ListItem(String),
    /// Two side-by-side signature slots above ruled lines.
    SignatureRow(Signatory, Signatory),
    Footer { left: String, right: String },
}

/// Flags chosen in the export dialog for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportFlags {
    pub draft: bool,
    pub include_witnesses: bool,
}

impl ExportFlags {
    /// Initial dialog state: witnesses follow the saved preference,
    /// drafts are always opt-in.
    pub fn for_settings(settings: &ContractSettings) -> Self {
        Self {
            draft: false,
            include_witnesses: settings.include_witnesses,
        }
    }
}

/// A fully composed contract, ready for rasterization.
#[derive(Debug, Clone)]
pub struct ContractDocument {
    pub blocks: Vec<Block>,
    /// Diagonal-style overlay text for draft exports.
    pub watermark: Option<String>,
    pub primary_color_hex: String,
}

const CLAUSE1_CONTRACTING: &str = "CONTRATANTE: {client_name}, portador(a) do CPF/CNPJ nº \
    {client_document}, e-mail {client_email}, telefone {client_phone}.";
const CLAUSE1_CONTRACTED: &str = "CONTRATADO(A): {provider_name}, portador(a) do CPF/CNPJ nº \
    {provider_document}, {provider_city_state}, e-mail {provider_email}.";
const CLAUSE2_OBJECT: &str = "O presente contrato tem por objeto a prestação do serviço de \
    {project_name}, conforme descrito a seguir: {project_description}";
const CLAUSE3_TERM: &str =
    "O serviço terá início em {start_date} e deverá ser entregue até {end_date}.";
const CLAUSE4_INTRO: &str =
    "O presente contrato estabelece duas modalidades de pagamento distintas:";
const CLAUSE4_SETUP: &str = "Valor de Setup (Criação): Pela execução e entrega do sistema objeto \
    deste contrato, o(a) CONTRATANTE pagará o valor fixo de R$ {setup_fee}, mediante \
    {payment_method}.";
const CLAUSE4_MONTHLY: &str = "Valor de Manutenção Mensal: Após a conclusão ou durante o período \
    de uso do sistema, o(a) CONTRATANTE pagará o valor fixo mensal de R$ {monthly_fee} para \
    garantir a disponibilidade, suporte e manutenção do serviço contratado.";
const CLAUSE4_DUE: &str = "O pagamento da taxa de manutenção mensal terá vencimento todo dia \
    {due_day} de cada mês subsequente ao início da prestação recorrente.";
const CLAUSE8_FORUM: &str = "Fica eleito o foro da comarca de {provider_city_state}, com renúncia \
    a qualquer outro, por mais privilegiado que seja, para dirimir quaisquer questões oriundas \
    do presente contrato.";

impl ContractDocument {
    /// Builds the full block list for one client. `issue_date` is supplied
    /// pre-formatted so composition stays clock-free.
    pub fn compose(
        client: &Client,
        settings: &ContractSettings,
        flags: ExportFlags,
        issue_date: &str,
        year: u16,
    ) -> Result<Self, TemplateError> {
        let contract_number = client.contract_number(year);
        let context = ContractContext {
            client,
            settings,
            contract_number: &contract_number,
            issue_date,
        };
        let expand = |template: &str| -> Result<String, TemplateError> {
            Ok(ClauseTemplate::parse(template)?.render(&context))
        };

        let mut blocks = Vec::new();
        blocks.push(Block::Title("CONTRATO DE PRESTAÇÃO DE SERVIÇOS".into()));
        blocks.push(Block::Subtitle(format!(
            "Número: {contract_number} | Data de Emissão: {issue_date}"
        )));

        blocks.push(Block::ClauseHeading("CLÁUSULA 1 — DAS PARTES".into()));
        blocks.push(Block::Paragraph(expand(CLAUSE1_CONTRACTING)?));
        blocks.push(Block::Paragraph(expand(CLAUSE1_CONTRACTED)?));

        blocks.push(Block::ClauseHeading("CLÁUSULA 2 — DO OBJETO".into()));
        blocks.push(Block::Paragraph(expand(CLAUSE2_OBJECT)?));

        blocks.push(Block::ClauseHeading("CLÁUSULA 3 — DO PRAZO".into()));
        blocks.push(Block::Paragraph(expand(CLAUSE3_TERM)?));

        blocks.push(Block::ClauseHeading(
            "CLÁUSULA 4 — DO VALOR E FORMA DE PAGAMENTO".into(),
        ));
        blocks.push(Block::Paragraph(expand(CLAUSE4_INTRO)?));
        blocks.push(Block::ListItem(expand(CLAUSE4_SETUP)?));
        blocks.push(Block::ListItem(expand(CLAUSE4_MONTHLY)?));
        blocks.push(Block::Paragraph(expand(CLAUSE4_DUE)?));

        blocks.push(Block::ClauseHeading(
            "CLÁUSULA 5 — DAS OBRIGAÇÕES DO CONTRATADO".into(),
        ));
        blocks.push(Block::Paragraph(expand(&settings.clause5_text)?));

        blocks.push(Block::ClauseHeading(
            "CLÁUSULA 6 — DAS OBRIGAÇÕES DO CONTRATANTE".into(),
        ));
        blocks.push(Block::Paragraph(expand(&settings.clause6_text)?));

        blocks.push(Block::ClauseHeading("CLÁUSULA 7 — DA RESCISÃO".into()));
        blocks.push(Block::Paragraph(expand(&settings.clause7_text)?));

        blocks.push(Block::ClauseHeading("CLÁUSULA 8 — DO FORO".into()));
        blocks.push(Block::Paragraph(expand(CLAUSE8_FORUM)?));

        let city = settings.provider_city();
        let city = if city.is_empty() { "[Sua Cidade]" } else { city };
        blocks.push(Block::Paragraph(format!("{city}, {issue_date}.")));

        blocks.push(Block::SignatureRow(
            Signatory {
                role: "CONTRATANTE".into(),
                name: client.name.clone(),
                document_line: format!(
                    "CPF/CNPJ: {}",
                    client.document.as_deref().unwrap_or("________________")
                ),
            },
            Signatory {
                role: "CONTRATADO(A)".into(),
                name: if settings.provider_name.is_empty() {
                    "[Seu Nome]".into()
                } else {
                    settings.provider_name.clone()
                },
                document_line: format!(
                    "CPF/CNPJ: {}",
                    if settings.provider_document.is_empty() {
                        "________________"
                    } else {
                        &settings.provider_document
                    }
                ),
            },
        ));

        if flags.include_witnesses {
            blocks.push(Block::SignatureRow(
                Signatory {
                    role: "TESTEMUNHA 1".into(),
                    name: "Nome: _________________".into(),
                    document_line: "CPF: _________________".into(),
                },
                Signatory {
                    role: "TESTEMUNHA 2".into(),
                    name: "Nome: _________________".into(),
                    document_line: "CPF: _________________".into(),
                },
            ));
        }

        blocks.push(Block::Footer {
            left: settings.custom_footer.clone(),
            right: format!("Contrato {contract_number}"),
        });

        Ok(Self {
            blocks,
            watermark: flags.draft.then(|| "RASCUNHO".to_string()),
            primary_color_hex: settings.primary_color.clone(),
        })
    }
}
