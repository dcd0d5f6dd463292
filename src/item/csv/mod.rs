/// CSV input of the loader.
///
/// [`csv_reader::CsvItemReader`] turns every data line of a CSV export into a
/// [`RawRow`](crate::fighter::record::RawRow): column names come from the
/// header line, values stay as text so that typing is left to the processor.
///
/// # Examples
///
/// ```
/// use fightstats_loader::item::csv::csv_reader::CsvItemReaderBuilder;
/// use fightstats_loader::core::item::ItemReader;
///
/// let csv_data = "\
/// fighterCode,FighterWins,Stance
/// F1,12,Orthodox
/// F2,,Southpaw
/// ";
///
/// let reader = CsvItemReaderBuilder::new()
///     .delimiter(b',')
///     .from_reader(csv_data.as_bytes())
///     .unwrap();
///
/// let mut codes = Vec::new();
/// while let Some(row) = reader.read().unwrap() {
///     codes.push(row.get("fighterCode").unwrap().to_string());
/// }
///
/// assert_eq!(codes, vec!["F1", "F2"]);
/// ```
pub mod csv_reader;
