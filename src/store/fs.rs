use std::{
    borrow::Cow,
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{TransactionRecord, VenueRow},
};

use super::{CatalogSource, CatalogStore};

/// Loads the source tables from CSV files on local disk.
///
/// Files are read as UTF-8 (with or without BOM). Anything else is decoded
/// with the fallback encoding, EUC-KR/CP949 unless configured otherwise.
#[derive(Debug, Clone)]
pub struct FsCatalogSource {
    transactions_path: PathBuf,
    cluster_paths: BTreeMap<u32, PathBuf>,
    fallback_encoding: &'static Encoding,
}

impl FsCatalogSource {
    pub fn new(transactions_path: PathBuf, cluster_paths: BTreeMap<u32, PathBuf>) -> Self {
        Self {
            transactions_path,
            cluster_paths,
            fallback_encoding: encoding_rs::EUC_KR,
        }
    }

    pub fn with_fallback_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.fallback_encoding = encoding;
        self
    }

    /// Resolves file locations from the data directory settings
    pub fn from_config(config: &Config) -> Self {
        let cluster_paths = config
            .cluster_ids
            .iter()
            .map(|&id| (id, config.cluster_path(id)))
            .collect();
        let source = Self::new(config.transactions_path(), cluster_paths);
        match config.fallback_encoding() {
            Some(encoding) => source.with_fallback_encoding(encoding),
            None => source,
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for FsCatalogSource {
    #[instrument(skip(self))]
    async fn load(&self) -> AppResult<CatalogStore> {
        let transactions: Vec<TransactionRecord> =
            read_table(&self.transactions_path, self.fallback_encoding).await?;

        let mut clusters = BTreeMap::new();
        for (&id, path) in &self.cluster_paths {
            let venues: Vec<VenueRow> = read_table(path, self.fallback_encoding).await?;
            clusters.insert(id, venues);
        }

        Ok(CatalogStore::new(transactions, clusters))
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

/// Reads one CSV file into typed rows
async fn read_table<T: DeserializeOwned>(
    path: &Path,
    fallback: &'static Encoding,
) -> AppResult<Vec<T>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::io(path, e))?;

    let (text, encoding) = decode(&bytes, fallback).ok_or_else(|| {
        AppError::DataUnavailable(format!(
            "{}: neither UTF-8 nor {}",
            path.display(),
            fallback.name()
        ))
    })?;

    let rows = parse_csv(text.as_bytes()).map_err(|e| AppError::csv(path, e))?;

    tracing::info!(
        path = %path.display(),
        encoding = encoding.name(),
        rows = rows.len(),
        "Loaded table"
    );

    Ok(rows)
}

/// Decodes a source file, honouring a BOM and falling back to `fallback`
/// when the bytes are not UTF-8. `None` if the fallback hits malformed input.
fn decode<'a>(
    bytes: &'a [u8],
    fallback: &'static Encoding,
) -> Option<(Cow<'a, str>, &'static Encoding)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (!had_errors).then_some((text, encoding));
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some((Cow::Borrowed(text), encoding_rs::UTF_8));
    }
    let (text, had_errors) = fallback.decode_without_bom_handling(bytes);
    (!had_errors).then_some((text, fallback))
}

fn parse_csv<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes)
        .deserialize()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRANSACTIONS: &str = "destination,category_label,gender,age_band,category_amount,category_count,demographic_amount,demographic_count\n\
        Haeundae (Busan),한식,F,20,30000,3,20000,2\n\
        Gwangalli,숙박,M,30,100000,1,50000,1\n";

    const CLUSTER: &str = "id,classification,destination,venue_name,image_url,rating,review_count,address,normalized_address,latitude,longitude\n\
        1,food,Haeundae,Sea Grill,,4.5,100,Busan,,35.16,129.16\n";

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_reads_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        let transactions = write_file(dir.path(), "tx.csv", TRANSACTIONS);
        let cluster = write_file(dir.path(), "encoding_cluster_0.csv", CLUSTER);

        let source = FsCatalogSource::new(transactions, BTreeMap::from([(0, cluster)]));
        let store = source.load().await.unwrap();

        assert_eq!(store.transactions().len(), 2);
        assert_eq!(store.transactions()[0].destination, "Haeundae");
        assert_eq!(store.cluster(0).unwrap().venues().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_cluster_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let transactions = write_file(dir.path(), "tx.csv", TRANSACTIONS);
        let missing = dir.path().join("encoding_cluster_3.csv");

        let source = FsCatalogSource::new(transactions, BTreeMap::from([(3, missing)]));
        let err = source.load().await.unwrap_err();

        assert!(matches!(err, AppError::DataUnavailable(_)));
        assert!(err.to_string().contains("encoding_cluster_3.csv"));
    }

    #[tokio::test]
    async fn test_unparsable_table_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let transactions = write_file(
            dir.path(),
            "tx.csv",
            "destination,category_label\nHaeundae,한식\n",
        );

        let source = FsCatalogSource::new(transactions, BTreeMap::new());
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_load_decodes_cp949_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let transactions = write_file(dir.path(), "tx.csv", TRANSACTIONS);

        let csv = "ID,분류,관광지,가맹점명,리뷰 수\n7,음식점,해운대 (부산),바다횟집,120.0\n";
        let (encoded, _, had_errors) = encoding_rs::EUC_KR.encode(csv);
        assert!(!had_errors);
        assert!(std::str::from_utf8(&encoded).is_err());
        let cluster = dir.path().join("encoding_cluster_1.csv");
        std::fs::write(&cluster, &encoded).unwrap();

        let source = FsCatalogSource::new(transactions, BTreeMap::from([(1, cluster)]));
        let store = source.load().await.unwrap();

        let venue = &store.cluster(1).unwrap().venues()[0];
        assert_eq!(venue.destination, "해운대");
        assert_eq!(venue.venue_name, "바다횟집");
        assert_eq!(venue.review_count, Some(120));
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFid,destination\n";
        let (text, encoding) = decode(bytes, encoding_rs::EUC_KR).unwrap();
        assert_eq!(text, "id,destination\n");
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_decode_rejects_malformed_fallback_input() {
        // 0xFF is not a valid EUC-KR lead byte
        assert!(decode(b"id\n\xFF\xFF\n", encoding_rs::EUC_KR).is_none());
    }

    #[test]
    fn test_from_config_maps_every_cluster() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            cluster_ids: vec![0, 2],
            ..Config::default()
        };
        let source = FsCatalogSource::from_config(&config);
        assert_eq!(source.cluster_paths.len(), 2);
        assert_eq!(
            source.cluster_paths[&2],
            PathBuf::from("/data/encoding_cluster_2.csv")
        );
        assert_eq!(source.fallback_encoding, encoding_rs::EUC_KR);
    }
}
