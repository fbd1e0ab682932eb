//! Demo dataset loader for `carhubd seed`: one seller, two buyers, a handful
//! of listings, and a pending offer. Wipes existing data first.

use anyhow::Result;
use tracing::info;

use crate::auth::password;
use crate::storage::Storage;
use crate::users::Role;

struct SeedCar {
    title: &'static str,
    brand: &'static str,
    model: &'static str,
    year: i64,
    price: f64,
    description: &'static str,
}

const SEED_CARS: &[SeedCar] = &[
    SeedCar {
        title: "2023 Tesla Model 3",
        brand: "Tesla",
        model: "Model 3",
        year: 2023,
        price: 45000.0,
        description: "Excellent condition, low mileage, fully electric vehicle with autopilot.",
    },
    SeedCar {
        title: "2022 BMW 3 Series",
        brand: "BMW",
        model: "3 Series",
        year: 2022,
        price: 38000.0,
        description: "Luxury sedan with premium features, well maintained.",
    },
    SeedCar {
        title: "2021 Honda Civic",
        brand: "Honda",
        model: "Civic",
        year: 2021,
        price: 24000.0,
        description: "Reliable daily driver, single owner, full service history.",
    },
    SeedCar {
        title: "2020 Toyota Camry",
        brand: "Toyota",
        model: "Camry",
        year: 2020,
        price: 22000.0,
        description: "Comfortable midsize sedan, great fuel economy.",
    },
    SeedCar {
        title: "2019 Ford Mustang GT",
        brand: "Ford",
        model: "Mustang GT",
        year: 2019,
        price: 35000.0,
        description: "V8 coupe, garage kept, performance exhaust.",
    },
];

pub async fn run(storage: &Storage) -> Result<()> {
    info!("Clearing existing data");
    storage.clear_all().await?;

    info!("Creating sample users");
    let seller_hash = password::hash("seller123")?;
    let buyer_hash = password::hash("buyer123")?;

    let seller = storage
        .create_user("John Seller", "seller@carhub.com", &seller_hash, Role::Seller)
        .await?;
    let buyer1 = storage
        .create_user("Alice Buyer", "buyer@carhub.com", &buyer_hash, Role::Buyer)
        .await?;
    storage
        .create_user("Bob Customer", "bob@carhub.com", &buyer_hash, Role::Buyer)
        .await?;

    info!("Creating sample cars");
    let mut first_car_id = None;
    for car in SEED_CARS {
        let row = storage
            .create_car(
                car.title,
                car.brand,
                car.model,
                car.year,
                car.price,
                car.description,
                "[]",
                &seller.id,
            )
            .await?;
        first_car_id.get_or_insert(row.id);
    }

    if let Some(car_id) = first_car_id {
        storage
            .create_offer(
                &car_id,
                &buyer1.id,
                42000.0,
                "Would you take 42k for a quick sale?",
            )
            .await?;
    }

    info!(
        "Seed complete: {} cars, login seller@carhub.com / seller123, buyer@carhub.com / buyer123",
        SEED_CARS.len()
    );
    Ok(())
}
