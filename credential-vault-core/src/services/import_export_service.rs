//! 凭证 CSV 导入导出服务

use std::fmt::Write as _;
use std::io::Read;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::CredentialService;
use crate::types::{
    AuthContext, CsvCredentialRow, CsvImportResult, ExportCsvResponse, ImportRowError,
};

/// Export column order, also the set of recognized import headers.
pub const CSV_COLUMNS: [&str; 11] = [
    "platform",
    "accountName",
    "url",
    "username",
    "password",
    "accountIdentity",
    "accountType",
    "status",
    "specialPin",
    "recoveryNumber",
    "recoveryEmail",
];

const EXPORT_FILENAME: &str = "credentials.csv";
const IMPORT_DUPLICATE_MESSAGE: &str =
    "Exact duplicate: A credential with identical values for all fields already exists";

/// 凭证导入导出服务
pub struct ImportExportService {
    credential_service: Arc<CredentialService>,
}

impl ImportExportService {
    /// 创建导入导出服务实例
    #[must_use]
    pub fn new(credential_service: Arc<CredentialService>) -> Self {
        Self { credential_service }
    }

    /// 导入 CSV
    ///
    /// Rows are handled strictly one after another so that each row's duplicate
    /// check sees every credential created by the rows before it. A rejected row
    /// is recorded and skipped; nothing already created is rolled back.
    ///
    /// Fails as a whole only when the caller is not authenticated or the CSV
    /// stream itself cannot be read. Rows created before such a fault stay committed.
    pub async fn import_csv<R>(&self, auth: &AuthContext, input: R) -> CoreResult<CsvImportResult>
    where
        R: Read + Send,
    {
        let user_id = auth.require_user()?;

        // Cells are trimmed per field by `CsvCredentialRow::into_fields`.
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(input);

        let mut total = 0;
        let mut created = 0;
        let mut errors = Vec::new();

        for record in reader.deserialize::<CsvCredentialRow>() {
            total += 1;
            let row = total;

            let record = record.map_err(|e| {
                log::error!("CSV import aborted at row {row} after {created} created: {e}");
                CoreError::ImportExportError(format!("Failed to parse CSV row {row}: {e}"))
            })?;
            let platform = record.platform_label();

            // 1. Defaults + schema validation
            let fields = match record.into_fields() {
                Ok(fields) => fields,
                Err(validation) => {
                    errors.push(ImportRowError {
                        row,
                        platform,
                        details: validation.to_string(),
                    });
                    continue;
                }
            };

            // 2. Duplicate check + insert
            match self
                .credential_service
                .create_for_user(user_id, fields)
                .await
            {
                Ok(_) => created += 1,
                Err(e) => {
                    let details = match e {
                        CoreError::Duplicate(_) => IMPORT_DUPLICATE_MESSAGE.to_string(),
                        other => {
                            other.log("CSV row import");
                            other.to_string()
                        }
                    };
                    errors.push(ImportRowError {
                        row,
                        platform,
                        details,
                    });
                }
            }
        }

        log::info!(
            "CSV import for user {user_id}: {total} rows, {created} created, {} failed",
            errors.len()
        );

        let error_report = if errors.is_empty() {
            String::new()
        } else {
            render_error_report(total, created, &errors)
        };

        Ok(CsvImportResult {
            success: errors.is_empty(),
            total,
            created,
            errors,
            error_report,
        })
    }

    /// 导出 CSV
    ///
    /// Exports every credential of the user, most recently changed first.
    pub async fn export_csv(&self, auth: &AuthContext) -> CoreResult<ExportCsvResponse> {
        let credentials = self.credential_service.search(auth, "").await?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer
            .write_record(CSV_COLUMNS)
            .map_err(|e| CoreError::ImportExportError(e.to_string()))?;
        for credential in &credentials {
            writer
                .serialize(CsvCredentialRow::from(credential))
                .map_err(|e| CoreError::ImportExportError(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::ImportExportError(e.to_string()))?;
        let content =
            String::from_utf8(bytes).map_err(|e| CoreError::SerializationError(e.to_string()))?;

        Ok(ExportCsvResponse {
            content,
            suggested_filename: EXPORT_FILENAME.to_string(),
            record_count: credentials.len(),
        })
    }
}

/// Plain-text import summary: counts and failure rate, then one block per rejected row.
#[must_use]
pub fn render_error_report(total: usize, created: usize, errors: &[ImportRowError]) -> String {
    #[allow(clippy::cast_precision_loss)]
    let failure_rate = if total == 0 {
        0.0
    } else {
        errors.len() as f64 / total as f64 * 100.0
    };

    let mut report = String::new();
    let _ = writeln!(report, "CSV Import Summary Report");
    let _ = writeln!(report, "Total Records Processed: {total}");
    let _ = writeln!(report, "Successfully Imported: {created}");
    let _ = writeln!(report, "Failed to Import: {}", errors.len());
    let _ = writeln!(report, "Failure Rate: {failure_rate:.1}%");
    let _ = writeln!(report);
    let _ = writeln!(report, "Detailed Import Failures:");

    let blocks: Vec<String> = errors
        .iter()
        .map(|e| format!("Row {} ({}):\n{}", e.row, e.platform, e.details))
        .collect();
    report.push_str(&blocks.join("\n\n"));
    report
}
