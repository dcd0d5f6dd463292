use log::{debug, warn};
use mongodb::{
    bson::{self, doc, Document},
    sync::{Client, ClientSession, Collection},
};

use crate::{core::item::ItemWriter, fighter::record::FighterDocument, BatchError};

/// Stores fighter documents in a MongoDB collection, keyed by `_id`.
///
/// Every write is a replace-or-insert, so loading the same export twice leaves
/// the collection as it was after the first load. `write` runs a whole chunk
/// in one transaction; `write_item` stores a single document without one.
///
/// Transactions need a replica set or a sharded cluster. Against a standalone
/// server every chunk is rejected and the step stores the documents one by one.
pub struct MongodbItemWriter<'a> {
    client: &'a Client,
    collection: &'a Collection<Document>,
}

impl MongodbItemWriter<'_> {
    fn replace(
        &self,
        item: &FighterDocument,
        session: Option<&mut ClientSession>,
    ) -> Result<(), BatchError> {
        let replacement = to_document(item)?;
        let action = self
            .collection
            .replace_one(doc! { "_id": item.id.as_str() }, replacement)
            .upsert(true);

        let result = match session {
            Some(session) => action.session(session).run(),
            None => action.run(),
        };

        result
            .map(|_| ())
            .map_err(|error| BatchError::ItemWriter(format!("document {}: {}", item.id, error)))
    }

    fn replace_all(
        &self,
        session: &mut ClientSession,
        items: &[FighterDocument],
    ) -> Result<(), BatchError> {
        for item in items {
            self.replace(item, Some(&mut *session))?;
        }
        Ok(())
    }
}

impl ItemWriter<FighterDocument> for MongodbItemWriter<'_> {
    fn write(&self, items: &[FighterDocument]) -> Result<(), BatchError> {
        let mut session = self
            .client
            .start_session()
            .run()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        session
            .start_transaction()
            .run()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        if let Err(error) = self.replace_all(&mut session, items) {
            if let Err(abort_error) = session.abort_transaction().run() {
                warn!("Unable to abort transaction: {}", abort_error);
            }
            return Err(error);
        }

        session
            .commit_transaction()
            .run()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        debug!("Committed {} documents", items.len());
        Ok(())
    }

    fn write_item(&self, item: &FighterDocument) -> Result<(), BatchError> {
        self.replace(item, None)
    }
}

/// Converts a fighter document into BSON with `_id` as its first field.
pub fn to_document(item: &FighterDocument) -> Result<Document, BatchError> {
    bson::to_document(item)
        .map_err(|error| BatchError::ItemWriter(format!("document {}: {}", item.id, error)))
}

#[derive(Default)]
pub struct MongodbItemWriterBuilder<'a> {
    client: Option<&'a Client>,
    collection: Option<&'a Collection<Document>>,
}

impl<'a> MongodbItemWriterBuilder<'a> {
    pub fn new() -> Self {
        Self {
            client: None,
            collection: None,
        }
    }

    /// Client used to open the session of each chunk transaction.
    pub fn client(mut self, client: &'a Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn collection(mut self, collection: &'a Collection<Document>) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn build(self) -> Result<MongodbItemWriter<'a>, BatchError> {
        let client = self.client.ok_or_else(|| {
            BatchError::Configuration("MongoDB writer needs a client".to_string())
        })?;
        let collection = self.collection.ok_or_else(|| {
            BatchError::Configuration("MongoDB writer needs a collection".to_string())
        })?;

        Ok(MongodbItemWriter { client, collection })
    }
}
