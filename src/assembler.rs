use crate::candidate::Candidate;
use crate::config::{FilterConfig, ScoutConfig};
use crate::document::ListingDocument;
use crate::extract::date::normalize_posted_date;
use crate::extract::FieldExtractors;
use crate::models::{ApartmentRecord, ExtractError, RejectionReason, Stage};
use crate::observer::{ListingObserver, NoopObserver, Outcome, StageEvent};
use crate::pipeline::ValidationPipeline;
use anyhow::Result;
use chrono::NaiveDate;

/// Turns one listing document into a canonical record or a rejection.
///
/// Holds no per-listing state, so one assembler can be shared across threads.
pub struct RecordAssembler<O = NoopObserver> {
    extractors: FieldExtractors,
    pipeline: ValidationPipeline,
    filter: FilterConfig,
    today: NaiveDate,
    observer: O,
}

impl RecordAssembler<NoopObserver> {
    /// `today` resolves "today" keywords in posted dates
    pub fn new(config: &ScoutConfig, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            extractors: FieldExtractors::new(config)?,
            pipeline: ValidationPipeline::standard(),
            filter: config.filter.clone(),
            today,
            observer: NoopObserver,
        })
    }
}

impl<O: ListingObserver> RecordAssembler<O> {
    pub fn with_observer<P: ListingObserver>(self, observer: P) -> RecordAssembler<P> {
        RecordAssembler {
            extractors: self.extractors,
            pipeline: self.pipeline,
            filter: self.filter,
            today: self.today,
            observer,
        }
    }

    pub fn with_pipeline(mut self, pipeline: ValidationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn assemble(&self, doc: &dyn ListingDocument) -> Result<ApartmentRecord, RejectionReason> {
        let listing_id = doc.listing_id();

        let candidate = self
            .candidate(doc, &listing_id)
            .map_err(|reason| self.report(reason))?;

        self.pipeline.run(&candidate, &self.filter, &self.observer)?;

        candidate
            .into_record(&self.filter.target_transaction_type)
            .map_err(|reason| self.report(reason))
    }

    /// Lazily assemble every listing; one result per input, in input order
    pub fn process_all<'s, D, I>(
        &'s self,
        listings: I,
    ) -> impl Iterator<Item = Result<ApartmentRecord, RejectionReason>> + 's
    where
        D: ListingDocument,
        I: IntoIterator<Item = D>,
        I::IntoIter: 's,
    {
        listings.into_iter().map(move |doc| self.assemble(&doc))
    }

    fn candidate(&self, doc: &dyn ListingDocument, listing_id: &str) -> Result<Candidate, RejectionReason> {
        let malformed = |err: ExtractError| RejectionReason::from_error(listing_id, Stage::Document, &err);
        let ex = &self.extractors;

        let url = ex.fields.url(doc).map_err(|err| match err {
            ExtractError::MalformedDocument { .. } => malformed(err),
            other => RejectionReason::from_error(listing_id, Stage::Url, &other),
        })?;

        let price = match ex.price.extract(doc) {
            Err(err @ ExtractError::MalformedDocument { .. }) => return Err(malformed(err)),
            other => other,
        };

        let rooms = ex.rooms.extract(doc).map_err(malformed)?;
        let bathrooms = ex.bathrooms.extract(doc).map_err(malformed)?;
        let transaction_type = ex.fields.transaction_type(doc).map_err(malformed)?;
        let utilities = ex.fields.utilities(doc).map_err(malformed)?;
        let description = ex.fields.description(doc).map_err(malformed)?;
        let raw_date = ex.fields.posted_date(doc).map_err(malformed)?;
        let posted = normalize_posted_date(raw_date.as_deref().unwrap_or(""), &ex.today_keywords, self.today);
        let furnishing = ex.furnishing.extract(doc);

        Candidate::builder(listing_id)
            .url(url.to_string())
            .transaction_type(transaction_type)
            .price(price)
            .rooms(rooms)
            .bathrooms(bathrooms)
            .utilities(utilities)
            .description(description)
            .posted(posted)
            .furnishing(furnishing)
            .build()
    }

    fn report(&self, reason: RejectionReason) -> RejectionReason {
        self.observer.observe(&StageEvent {
            listing_id: &reason.listing_id,
            stage: reason.stage,
            outcome: Outcome::Rejected {
                kind: reason.kind,
                value: reason.value.clone(),
            },
        });
        reason
    }
}
