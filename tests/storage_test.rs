//! Storage-level tests: listing filters/sort/pagination and the offer
//! lifecycle transaction, against a real SQLite file in a temp dir.

use carhubd::cars::{CarFilter, CarSort, CarStatus};
use carhubd::offers::OfferStatus;
use carhubd::storage::Storage;
use carhubd::users::{Role, UserRow};
use tempfile::TempDir;

async fn make_storage(dir: &TempDir) -> Storage {
    Storage::new(dir.path()).await.unwrap()
}

async fn make_user(storage: &Storage, email: &str, role: Role) -> UserRow {
    storage
        .create_user("Test User", email, "$argon2id$fake", role)
        .await
        .unwrap()
}

async fn seed_cars(storage: &Storage, seller_id: &str) {
    let cars = [
        ("2023 Tesla Model 3", "Tesla", "Model 3", 2023, 45000.0),
        ("2022 BMW 3 Series", "BMW", "3 Series", 2022, 38000.0),
        ("2021 Honda Civic", "Honda", "Civic", 2021, 24000.0),
        ("2018 Honda Accord", "Honda", "Accord", 2018, 18000.0),
    ];
    for (title, brand, model, year, price) in cars {
        storage
            .create_car(title, brand, model, year, price, "", "[]", seller_id)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn duplicate_email_is_rejected_by_unique_index() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    make_user(&storage, "dup@carhub.com", Role::Buyer).await;
    let err = storage
        .create_user("Other", "dup@carhub.com", "$argon2id$fake", Role::Buyer)
        .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn search_matches_title_and_description_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    seed_cars(&storage, &seller.id).await;

    let filter = CarFilter {
        search: Some("tesla".into()),
        ..Default::default()
    };
    let (rows, total) = storage
        .list_cars(&filter, CarSort::Newest, 1, 12)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].car.brand, "Tesla");
}

#[tokio::test]
async fn brand_and_range_filters_combine() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    seed_cars(&storage, &seller.id).await;

    let filter = CarFilter {
        brand: Some("honda".into()),
        min_year: Some(2020),
        ..Default::default()
    };
    let (rows, total) = storage
        .list_cars(&filter, CarSort::Newest, 1, 12)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].car.model, "Civic");

    let filter = CarFilter {
        min_price: Some(20000.0),
        max_price: Some(40000.0),
        ..Default::default()
    };
    let (_, total) = storage
        .list_cars(&filter, CarSort::Newest, 1, 12)
        .await
        .unwrap();
    assert_eq!(total, 2, "BMW 38k and Civic 24k fall in range");
}

#[tokio::test]
async fn price_sort_orders_ascending() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    seed_cars(&storage, &seller.id).await;

    let (rows, _) = storage
        .list_cars(&CarFilter::default(), CarSort::PriceAsc, 1, 12)
        .await
        .unwrap();
    let prices: Vec<f64> = rows.iter().map(|r| r.car.price).collect();
    assert_eq!(prices, vec![18000.0, 24000.0, 38000.0, 45000.0]);
}

#[tokio::test]
async fn pagination_reports_total_and_empty_overflow_pages() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    seed_cars(&storage, &seller.id).await;

    let (page1, total) = storage
        .list_cars(&CarFilter::default(), CarSort::PriceAsc, 1, 3)
        .await
        .unwrap();
    assert_eq!(total, 4);
    assert_eq!(page1.len(), 3);

    let (page2, _) = storage
        .list_cars(&CarFilter::default(), CarSort::PriceAsc, 2, 3)
        .await
        .unwrap();
    assert_eq!(page2.len(), 1);

    let (page9, total) = storage
        .list_cars(&CarFilter::default(), CarSort::PriceAsc, 9, 3)
        .await
        .unwrap();
    assert!(page9.is_empty());
    assert_eq!(total, 4, "overflow pages still report the real total");

    // Even an absurd page number is just an empty page, never a panic.
    let (far, total) = storage
        .list_cars(&CarFilter::default(), CarSort::PriceAsc, i64::MAX, 12)
        .await
        .unwrap();
    assert!(far.is_empty());
    assert_eq!(total, 4);
}

#[tokio::test]
async fn limit_is_clamped() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    seed_cars(&storage, &seller.id).await;

    // limit 0 behaves as 1 rather than erroring or returning everything
    let (rows, _) = storage
        .list_cars(&CarFilter::default(), CarSort::Newest, 1, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn sold_cars_leave_the_public_listing_but_not_the_seller_dashboard() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    let buyer = make_user(&storage, "b@carhub.com", Role::Buyer).await;
    let car = storage
        .create_car("2023 Tesla Model 3", "Tesla", "Model 3", 2023, 45000.0, "", "[]", &seller.id)
        .await
        .unwrap();

    let offer = storage
        .create_offer(&car.id, &buyer.id, 42000.0, "")
        .await
        .unwrap();
    storage
        .set_offer_status(&offer.offer.id, &car.id, OfferStatus::Accepted)
        .await
        .unwrap();

    let (rows, total) = storage
        .list_cars(&CarFilter::default(), CarSort::Newest, 1, 12)
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(rows.is_empty());

    let mine = storage.list_cars_by_seller(&seller.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].car.status, CarStatus::Sold);
}

#[tokio::test]
async fn accepting_an_offer_marks_only_that_offer_and_the_car() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    let buyer1 = make_user(&storage, "b1@carhub.com", Role::Buyer).await;
    let buyer2 = make_user(&storage, "b2@carhub.com", Role::Buyer).await;
    let car = storage
        .create_car("2021 Honda Civic", "Honda", "Civic", 2021, 24000.0, "", "[]", &seller.id)
        .await
        .unwrap();

    let first = storage.create_offer(&car.id, &buyer1.id, 23000.0, "").await.unwrap();
    let second = storage.create_offer(&car.id, &buyer2.id, 22000.0, "").await.unwrap();

    let updated = storage
        .set_offer_status(&first.offer.id, &car.id, OfferStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(updated.offer.status, OfferStatus::Accepted);

    // Sibling offers stay pending; only the car flips to sold.
    let sibling = storage
        .get_offer(&second.offer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sibling.status, OfferStatus::Pending);
    let car = storage.get_car(&car.id).await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Sold);
}

#[tokio::test]
async fn rejecting_an_offer_keeps_the_car_available() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    let buyer = make_user(&storage, "b@carhub.com", Role::Buyer).await;
    let car = storage
        .create_car("2021 Honda Civic", "Honda", "Civic", 2021, 24000.0, "", "[]", &seller.id)
        .await
        .unwrap();
    let offer = storage.create_offer(&car.id, &buyer.id, 1000.0, "lowball").await.unwrap();

    let updated = storage
        .set_offer_status(&offer.offer.id, &car.id, OfferStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(updated.offer.status, OfferStatus::Rejected);

    let car = storage.get_car(&car.id).await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Available);
}

#[tokio::test]
async fn seller_requests_span_all_of_their_cars() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    let other_seller = make_user(&storage, "s2@carhub.com", Role::Seller).await;
    let buyer = make_user(&storage, "b@carhub.com", Role::Buyer).await;

    let car_a = storage
        .create_car("A", "Tesla", "S", 2020, 1.0, "", "[]", &seller.id)
        .await
        .unwrap();
    let car_b = storage
        .create_car("B", "BMW", "i4", 2021, 2.0, "", "[]", &seller.id)
        .await
        .unwrap();
    let car_other = storage
        .create_car("C", "Ford", "F150", 2022, 3.0, "", "[]", &other_seller.id)
        .await
        .unwrap();

    storage.create_offer(&car_a.id, &buyer.id, 1.0, "").await.unwrap();
    storage.create_offer(&car_b.id, &buyer.id, 2.0, "").await.unwrap();
    storage.create_offer(&car_other.id, &buyer.id, 3.0, "").await.unwrap();

    let requests = storage.list_offers_for_seller(&seller.id).await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|o| o.car_seller_id == seller.id));

    let mine = storage.list_offers_by_buyer(&buyer.id).await.unwrap();
    assert_eq!(mine.len(), 3);
}

#[tokio::test]
async fn deleting_a_car_removes_its_offers() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;
    let seller = make_user(&storage, "s@carhub.com", Role::Seller).await;
    let buyer = make_user(&storage, "b@carhub.com", Role::Buyer).await;
    let car = storage
        .create_car("A", "Tesla", "S", 2020, 1.0, "", "[]", &seller.id)
        .await
        .unwrap();
    let offer = storage.create_offer(&car.id, &buyer.id, 1.0, "").await.unwrap();

    storage.delete_car(&car.id).await.unwrap();
    assert!(storage.get_car(&car.id).await.unwrap().is_none());
    assert!(storage.get_offer(&offer.offer.id).await.unwrap().is_none());
}
