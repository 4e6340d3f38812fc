//! PostgreSQL-backed store for invoice-service.

use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::models::{
    Invoice, InvoiceFilter, InvoiceStatistic, NewInvoice, NewPerson, Person, PersonStatistic,
};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::store::{InvoiceStore, PersonStore};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for Database {
    #[instrument(skip(self, input), fields(buyer_id = input.buyer_id, seller_id = input.seller_id))]
    async fn create_invoice(&self, input: &NewInvoice) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (invoice_number, issued, due_date, product, price, vat, note, buyer_id, seller_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING invoice_id, invoice_number, issued, due_date, product, price, vat, note, buyer_id, seller_id, created_utc
            "#,
        )
        .bind(input.invoice_number)
        .bind(input.issued)
        .bind(input.due_date)
        .bind(&input.product)
        .bind(input.price)
        .bind(input.vat)
        .bind(&input.note)
        .bind(input.buyer_id)
        .bind(input.seller_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "Buyer or seller was removed while the invoice was being saved"
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)),
        })?;

        timer.observe_duration();

        info!(invoice_id = invoice.invoice_id, "Invoice created");

        Ok(invoice)
    }

    #[instrument(skip(self, invoice), fields(invoice_id = invoice.invoice_id))]
    async fn update_invoice(&self, invoice: &Invoice) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let updated = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET invoice_number = $2,
                issued = $3,
                due_date = $4,
                product = $5,
                price = $6,
                vat = $7,
                note = $8,
                buyer_id = $9,
                seller_id = $10
            WHERE invoice_id = $1
            RETURNING invoice_id, invoice_number, issued, due_date, product, price, vat, note, buyer_id, seller_id, created_utc
            "#,
        )
        .bind(invoice.invoice_id)
        .bind(invoice.invoice_number)
        .bind(invoice.issued)
        .bind(invoice.due_date)
        .bind(&invoice.product)
        .bind(invoice.price)
        .bind(invoice.vat)
        .bind(&invoice.note)
        .bind(invoice.buyer_id)
        .bind(invoice.seller_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        timer.observe_duration();

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn get_invoice(&self, invoice_id: i64) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, invoice_number, issued, due_date, product, price, vat, note, buyer_id, seller_id, created_utc
            FROM invoices
            WHERE invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self))]
    async fn delete_invoice(&self, invoice_id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query("DELETE FROM invoices WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, filter))]
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, invoice_number, issued, due_date, product, price, vat, note, buyer_id, seller_id, created_utc
            FROM invoices
            WHERE ($1::bigint IS NULL OR buyer_id = $1)
              AND ($2::bigint IS NULL OR seller_id = $2)
              AND ($3::text IS NULL OR product ILIKE '%' || $3 || '%')
              AND ($4::numeric IS NULL OR price >= $4)
              AND ($5::numeric IS NULL OR price <= $5)
            ORDER BY invoice_id
            LIMIT $6
            "#,
        )
        .bind(filter.buyer_id)
        .bind(filter.seller_id)
        .bind(&filter.product)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.effective_limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    #[instrument(skip(self))]
    async fn list_sales(&self, identification_number: &str) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_sales"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT i.invoice_id, i.invoice_number, i.issued, i.due_date, i.product, i.price,
                i.vat, i.note, i.buyer_id, i.seller_id, i.created_utc
            FROM invoices i
            JOIN persons p ON p.person_id = i.seller_id
            WHERE p.identification_number = $1
            ORDER BY i.invoice_id
            "#,
        )
        .bind(identification_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list sales: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    #[instrument(skip(self))]
    async fn list_purchases(&self, identification_number: &str) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_purchases"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT i.invoice_id, i.invoice_number, i.issued, i.due_date, i.product, i.price,
                i.vat, i.note, i.buyer_id, i.seller_id, i.created_utc
            FROM invoices i
            JOIN persons p ON p.person_id = i.buyer_id
            WHERE p.identification_number = $1
            ORDER BY i.invoice_id
            "#,
        )
        .bind(identification_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list purchases: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    #[instrument(skip(self))]
    async fn invoice_statistic(&self) -> Result<InvoiceStatistic, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["invoice_statistic"])
            .start_timer();

        let statistic = sqlx::query_as::<_, InvoiceStatistic>(
            r#"
            SELECT
                COALESCE(SUM(price) FILTER (
                    WHERE date_part('year', issued) = date_part('year', CURRENT_DATE)
                ), 0) AS current_year_sum,
                COALESCE(SUM(price), 0) AS all_time_sum,
                COUNT(*) AS invoices_count
            FROM invoices
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to compute invoice statistic: {}", e))
        })?;

        timer.observe_duration();

        Ok(statistic)
    }

    #[instrument(skip(self))]
    async fn seller_statistics(&self) -> Result<Vec<PersonStatistic>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["seller_statistics"])
            .start_timer();

        let statistics = sqlx::query_as::<_, PersonStatistic>(
            r#"
            SELECT p.person_id, p.name AS person_name, COALESCE(SUM(i.price), 0) AS revenue
            FROM persons p
            JOIN invoices i ON i.seller_id = p.person_id
            GROUP BY p.person_id, p.name
            ORDER BY p.person_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to compute seller statistics: {}", e))
        })?;

        timer.observe_duration();

        Ok(statistics)
    }
}

#[async_trait]
impl PersonStore for Database {
    #[instrument(skip(self, input), fields(identification_number = %input.identification_number))]
    async fn create_person(&self, input: &NewPerson) -> Result<Person, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_person"])
            .start_timer();

        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO persons (name, identification_number, tax_number, account_number,
                bank_code, iban, telephone, mail, street, zip, city, country, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING person_id, name, identification_number, tax_number, account_number,
                bank_code, iban, telephone, mail, street, zip, city, country, note, hidden, created_utc
            "#,
        )
        .bind(&input.name)
        .bind(&input.identification_number)
        .bind(&input.tax_number)
        .bind(&input.account_number)
        .bind(&input.bank_code)
        .bind(&input.iban)
        .bind(&input.telephone)
        .bind(&input.mail)
        .bind(&input.street)
        .bind(&input.zip)
        .bind(&input.city)
        .bind(&input.country)
        .bind(&input.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create person: {}", e)))?;

        timer.observe_duration();

        info!(person_id = person.person_id, "Person created");

        Ok(person)
    }

    #[instrument(skip(self, person), fields(person_id = person.person_id))]
    async fn update_person(&self, person: &Person) -> Result<Option<Person>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_person"])
            .start_timer();

        let updated = sqlx::query_as::<_, Person>(
            r#"
            UPDATE persons
            SET name = $2,
                identification_number = $3,
                tax_number = $4,
                account_number = $5,
                bank_code = $6,
                iban = $7,
                telephone = $8,
                mail = $9,
                street = $10,
                zip = $11,
                city = $12,
                country = $13,
                note = $14
            WHERE person_id = $1
            RETURNING person_id, name, identification_number, tax_number, account_number,
                bank_code, iban, telephone, mail, street, zip, city, country, note, hidden, created_utc
            "#,
        )
        .bind(person.person_id)
        .bind(&person.name)
        .bind(&person.identification_number)
        .bind(&person.tax_number)
        .bind(&person.account_number)
        .bind(&person.bank_code)
        .bind(&person.iban)
        .bind(&person.telephone)
        .bind(&person.mail)
        .bind(&person.street)
        .bind(&person.zip)
        .bind(&person.city)
        .bind(&person.country)
        .bind(&person.note)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update person: {}", e)))?;

        timer.observe_duration();

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn get_person(&self, person_id: i64) -> Result<Option<Person>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_person"])
            .start_timer();

        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT person_id, name, identification_number, tax_number, account_number,
                bank_code, iban, telephone, mail, street, zip, city, country, note, hidden, created_utc
            FROM persons
            WHERE person_id = $1
            "#,
        )
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get person: {}", e)))?;

        timer.observe_duration();

        Ok(person)
    }

    #[instrument(skip(self))]
    async fn list_persons(&self) -> Result<Vec<Person>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_persons"])
            .start_timer();

        let persons = sqlx::query_as::<_, Person>(
            r#"
            SELECT person_id, name, identification_number, tax_number, account_number,
                bank_code, iban, telephone, mail, street, zip, city, country, note, hidden, created_utc
            FROM persons
            WHERE hidden = FALSE
            ORDER BY person_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list persons: {}", e)))?;

        timer.observe_duration();

        Ok(persons)
    }

    #[instrument(skip(self))]
    async fn hide_person(&self, person_id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["hide_person"])
            .start_timer();

        let result = sqlx::query("UPDATE persons SET hidden = TRUE WHERE person_id = $1")
            .bind(person_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to hide person: {}", e)))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }
}
