//! Conversions between rows and transport representations.
//!
//! Relation fields get separate treatment on update: `apply_invoice_update`
//! copies every scalar but leaves `buyer_id`/`seller_id` alone, because the
//! referenced persons must be looked up and validated before reattachment.

use anyhow::anyhow;
use service_core::error::AppError;

use crate::dto::{InvoiceDto, InvoiceStatisticDto, PersonDto, PersonStatisticDto};
use crate::models::{
    Invoice, InvoiceStatistic, NewInvoice, NewPerson, Person, PersonStatistic,
};

pub fn person_to_dto(person: &Person) -> PersonDto {
    PersonDto {
        id: Some(person.person_id),
        name: person.name.clone(),
        identification_number: person.identification_number.clone(),
        tax_number: person.tax_number.clone(),
        account_number: person.account_number.clone(),
        bank_code: person.bank_code.clone(),
        iban: person.iban.clone(),
        telephone: person.telephone.clone(),
        mail: person.mail.clone(),
        street: person.street.clone(),
        zip: person.zip.clone(),
        city: person.city.clone(),
        country: person.country.clone(),
        note: person.note.clone(),
    }
}

pub fn new_person_from_dto(dto: &PersonDto) -> NewPerson {
    NewPerson {
        name: dto.name.clone(),
        identification_number: dto.identification_number.clone(),
        tax_number: dto.tax_number.clone(),
        account_number: dto.account_number.clone(),
        bank_code: dto.bank_code.clone(),
        iban: dto.iban.clone(),
        telephone: dto.telephone.clone(),
        mail: dto.mail.clone(),
        street: dto.street.clone(),
        zip: dto.zip.clone(),
        city: dto.city.clone(),
        country: dto.country.clone(),
        note: dto.note.clone(),
    }
}

/// Overwrite the scalar fields of an existing person. Identity and the
/// `hidden` flag stay as they are.
pub fn apply_person_update(dto: &PersonDto, person: &mut Person) {
    person.name = dto.name.clone();
    person.identification_number = dto.identification_number.clone();
    person.tax_number = dto.tax_number.clone();
    person.account_number = dto.account_number.clone();
    person.bank_code = dto.bank_code.clone();
    person.iban = dto.iban.clone();
    person.telephone = dto.telephone.clone();
    person.mail = dto.mail.clone();
    person.street = dto.street.clone();
    person.zip = dto.zip.clone();
    person.city = dto.city.clone();
    person.country = dto.country.clone();
    person.note = dto.note.clone();
}

pub fn invoice_to_dto(invoice: &Invoice, buyer: &Person, seller: &Person) -> InvoiceDto {
    InvoiceDto {
        id: Some(invoice.invoice_id),
        invoice_number: invoice.invoice_number,
        issued: invoice.issued,
        due_date: invoice.due_date,
        product: invoice.product.clone(),
        price: invoice.price,
        vat: invoice.vat,
        note: invoice.note.clone(),
        buyer: person_to_dto(buyer),
        seller: person_to_dto(seller),
    }
}

/// Id of a nested person reference. Inbound invoices may carry bare
/// references (`{"id": 1}`); an id-less reference is unusable.
pub fn person_ref_id(person: &PersonDto, role: &str) -> Result<i64, AppError> {
    person
        .id
        .ok_or_else(|| AppError::BadRequest(anyhow!("invoice {} reference is missing an id", role)))
}

pub fn new_invoice_from_dto(dto: &InvoiceDto) -> Result<NewInvoice, AppError> {
    Ok(NewInvoice {
        invoice_number: dto.invoice_number,
        issued: dto.issued,
        due_date: dto.due_date,
        product: dto.product.clone(),
        price: dto.price,
        vat: dto.vat,
        note: dto.note.clone(),
        buyer_id: person_ref_id(&dto.buyer, "buyer")?,
        seller_id: person_ref_id(&dto.seller, "seller")?,
    })
}

/// Overwrite every scalar field of an existing invoice from the transport
/// object. `buyer_id` and `seller_id` are deliberately not touched here.
pub fn apply_invoice_update(dto: &InvoiceDto, invoice: &mut Invoice) {
    invoice.invoice_number = dto.invoice_number;
    invoice.issued = dto.issued;
    invoice.due_date = dto.due_date;
    invoice.product = dto.product.clone();
    invoice.price = dto.price;
    invoice.vat = dto.vat;
    invoice.note = dto.note.clone();
}

pub fn statistic_to_dto(statistic: &InvoiceStatistic) -> InvoiceStatisticDto {
    InvoiceStatisticDto {
        current_year_sum: statistic.current_year_sum,
        all_time_sum: statistic.all_time_sum,
        invoices_count: statistic.invoices_count,
    }
}

pub fn person_statistic_to_dto(statistic: &PersonStatistic) -> PersonStatisticDto {
    PersonStatisticDto {
        person_id: statistic.person_id,
        person_name: statistic.person_name.clone(),
        revenue: statistic.revenue,
    }
}
