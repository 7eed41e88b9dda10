use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use verifactu::core::{Address, Customer, Invoice, InvoiceLine};
use verifactu::sync::{EngineConfig, SyncEngine, VerifactuClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // No credential configured: the engine runs in simulated mode and
    // never touches the network.
    let config = EngineConfig::simulated();
    let engine = Arc::new(SyncEngine::new(VerifactuClient::new(config)?));

    let customer = Customer {
        local_id: "cus-1".into(),
        name: "Cliente Ejemplo SL".into(),
        fiscal_id: "B65410011".into(),
        address: Address {
            street: Some("Calle Mayor 1".into()),
            city: "Madrid".into(),
            postal_code: "28001".into(),
            province: Some("Madrid".into()),
            country_code: "ES".into(),
        },
        email: Some("facturas@ejemplo.es".into()),
        phone: None,
    };

    println!("=== Customer sync ===\n");
    let state = engine.create_customer(&customer).await?;
    println!(
        "  status={:?} external_id={} simulated={}",
        state.status,
        state.external_id.as_deref().unwrap_or("—"),
        state.simulated
    );

    let invoice = Invoice {
        local_id: "inv-1".into(),
        number: "FAC-2026-001".into(),
        issue_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        customer_name: customer.name.clone(),
        customer_fiscal_id: customer.fiscal_id.clone(),
        lines: vec![InvoiceLine {
            description: "Consultoría".into(),
            quantity: dec!(10),
            unit_price: dec!(95),
            iva_rate: dec!(21),
        }],
    };

    println!("\n=== Invoice sync ===\n");
    let state = engine.create_invoice(&invoice).await?;
    println!("  created:   {:?}", state.status);

    let state = engine.submit_invoice("inv-1").await?;
    println!("  submitted: {:?}", state.status);

    // Poll until the (simulated) pipeline reports a terminal status.
    let watch = engine.watch_invoice("inv-1", Duration::from_millis(100));
    watch.join().await;

    let state = engine
        .state(verifactu::sync::EntityKind::Invoice, "inv-1")
        .await
        .expect("invoice was synced");
    println!("  final:     {:?} (simulated={})", state.status, state.simulated);

    Ok(())
}
