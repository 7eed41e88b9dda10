use verifactu::nif::{classify, validate};

fn main() {
    println!("=== Spanish Fiscal Identifier Validation ===\n");

    let test_ids = [
        "12345678Z",     // NIF
        "12.345.678-Z",  // NIF, display form
        "X1234567L",     // NIE
        "Z5555555W",     // NIE
        "A28015865",     // CIF, numeric control
        "P1234567D",     // CIF, letter control
        "12345678A",     // wrong check letter
        "B12345678",     // wrong control digit
        "not-an-id",
    ];

    for id in &test_ids {
        let kind = classify(id);
        let ok = validate(id);
        println!(
            "  {id:<14} => {kind:?}, {}",
            if ok { "valid" } else { "INVALID" }
        );
    }
}
