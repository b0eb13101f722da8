use crate::conf::{Overrides, load_config};
use crate::enrichment::AsnDatabase;
use std::path::Path;

pub fn check(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<()> {
    let cfg = load_config(path, overrides)?;

    println!("✔ Config loaded successfully");
    println!("✔ syslog intake on {}", cfg.ingest.listen);
    println!("✔ metrics endpoint on {}", cfg.metrics.listen);
    println!("✔ monitored protocols: {}", cfg.protocols.join(", "));
    println!("✔ {} device aliases", cfg.devices.len());

    AsnDatabase::open(&cfg.enrichment.asn_db)?;
    println!("✔ ASN database {} opened", cfg.enrichment.asn_db.display());

    Ok(())
}
