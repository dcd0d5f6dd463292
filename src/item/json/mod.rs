/// JSON export of processed documents.
///
/// [`json_writer::JsonItemWriter`] writes every item it receives as one
/// element of a single JSON array. It is the loader's offline destination:
/// the documents that would be stored end up in a file that can be reviewed
/// or imported elsewhere.
///
/// # Examples
///
/// ```
/// use fightstats_loader::item::json::json_writer::JsonItemWriterBuilder;
/// use fightstats_loader::core::item::ItemWriter;
/// use serde_json::json;
///
/// let writer = JsonItemWriterBuilder::new().from_writer(Vec::new());
///
/// ItemWriter::<serde_json::Value>::open(&writer).unwrap();
/// ItemWriter::<serde_json::Value>::write(&writer, &[json!({"_id": "F1"}), json!({"_id": "F2"})]).unwrap();
/// ItemWriter::<serde_json::Value>::close(&writer).unwrap();
///
/// let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(output, "[{\"_id\":\"F1\"},{\"_id\":\"F2\"}]\n");
/// ```
pub mod json_writer;
