//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 products (default)
//! cargo run -p bizdesk-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p bizdesk-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p bizdesk-db --bin seed -- --db ./data/bizdesk.db
//! ```
//!
//! ## Generated Data
//! - Products across a few categories, SKU `{CATEGORY}-{INDEX}`
//! - A handful of customers
//! - One sale per customer with stock decremented, and a delivery for
//!   every other sale
//!
//! Some products start below the low-stock threshold so the dashboard has
//! something to show.

use bizdesk_core::{
    Customer, CustomerDraft, Delivery, DeliveryDraft, DeliveryStatus, Money, Product,
    ProductDraft, Sale, SaleDraft,
};
use bizdesk_db::{Database, DbConfig};
use std::env;

/// Product categories for demo data
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "STA",
        "Stationery",
        &["A5 Notebook", "Gel Pen", "Stapler", "Desk Organizer", "Sticky Notes"],
    ),
    (
        "KIT",
        "Kitchen",
        &["Chef Knife", "Cutting Board", "Mixing Bowl", "Tea Kettle", "Measuring Cups"],
    ),
    (
        "ELE",
        "Electronics",
        &["USB-C Cable", "Wireless Mouse", "Power Bank", "Desk Lamp", "Earbuds"],
    ),
    (
        "GAR",
        "Garden",
        &["Watering Can", "Pruning Shears", "Seed Tray", "Garden Gloves", "Plant Pot"],
    ),
];

/// Demo customers: (name, email, phone, address)
const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    ("Ada Lovelace", "ada@example.com", "+44 20 7946 0011", "12 St James's Square, London"),
    ("Grace Hopper", "grace@example.com", "+1 (212) 555-0142", "1 Navy Yard, Arlington"),
    ("Alan O'Neil", "alan@example.com", "", "4 Harbour Road, Cork"),
    ("Mary-Jane Watts", "", "+61 2 5550 1234", ""),
    ("Linus Berg", "linus@example.org", "", "Kungsgatan 8, Stockholm"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./bizdesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("BizDesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./bizdesk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("BizDesk Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Products
    let mut products = Vec::with_capacity(count);
    let mut index = 0usize;
    'outer: loop {
        for (code, category, names) in CATEGORIES {
            for name in names.iter() {
                if products.len() >= count {
                    break 'outer;
                }
                let product = generate_product(code, category, name, index);
                match db.products().insert(&product).await {
                    Ok(product) => products.push(product),
                    Err(e) => eprintln!("Failed to insert {}: {}", product.name, e),
                }
                index += 1;
            }
        }
        if index == 0 {
            break;
        }
    }
    println!("✓ Generated {} products", products.len());

    // Customers
    let mut customers = Vec::with_capacity(CUSTOMERS.len());
    for (name, email, phone, address) in CUSTOMERS {
        let customer = Customer::from_draft(CustomerDraft {
            name: name.to_string(),
            email: non_empty(email),
            phone: non_empty(phone),
            address: non_empty(address),
        });
        customers.push(db.customers().insert(&customer).await?);
    }
    println!("✓ Generated {} customers", customers.len());

    // Sales and deliveries
    let mut sales = 0;
    let mut deliveries = 0;
    for (n, (customer, product)) in customers.iter().zip(products.iter()).enumerate() {
        let quantity = (n as i64 % 3) + 1;
        if product.stock_quantity < quantity {
            continue;
        }

        let sale = Sale::from_draft(&SaleDraft {
            product_id: product.id.clone(),
            customer_id: Some(customer.id.clone()),
            quantity_sold: quantity,
            unit_price: product.price(),
        });
        db.sales().insert(&sale).await?;
        db.products()
            .set_stock(&product.id, product.stock_quantity - quantity)
            .await?;
        sales += 1;

        if n % 2 == 0 {
            let status = DeliveryStatus::ALL[n / 2 % DeliveryStatus::ALL.len()];
            let delivery = Delivery::from_draft(DeliveryDraft {
                sales_record_id: sale.id.clone(),
                delivery_address: customer
                    .address
                    .clone()
                    .unwrap_or_else(|| "Collect in store".to_string()),
                delivery_status: status,
                tracking_number: Some(format!("TRK{:06}", n + 1)),
            });
            db.deliveries().insert(&delivery).await?;
            deliveries += 1;
        }
    }
    println!("✓ Generated {} sales, {} deliveries", sales, deliveries);

    let (total, low) = db.products().stock_summary(bizdesk_core::LOW_STOCK_THRESHOLD).await?;
    println!();
    println!("  {} products, {} below the low-stock threshold", total, low);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates one product with deterministic price and stock.
fn generate_product(code: &str, category: &str, name: &str, index: usize) -> Product {
    // Every seventh product starts low on stock.
    let stock = if index % 7 == 0 {
        (index % 5) as i64 + 2
    } else {
        20 + (index as i64 * 13) % 180
    };

    let price = Money::from_cents(199 + (index as i64 * 137) % 4800);

    let round = index / 20;
    let display_name = if round == 0 {
        name.to_string()
    } else {
        format!("{} {}", name, round + 1)
    };

    Product::from_draft(ProductDraft {
        name: display_name,
        sku: Some(format!("{}-{:04}", code, index + 1)),
        description: Some(format!("{} from the {} range", name, category)),
        price,
        stock_quantity: stock,
        category: Some(category.to_string()),
    })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
