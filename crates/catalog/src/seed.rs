//! Demo marketplace data
//!
//! Two sellers (one with an NSFW account), an under-age unverified buyer, a
//! verified buyer, five listings, one past sale and three open bids. All
//! timestamps are relative to `now` so the data stays fresh.

use chrono::{DateTime, Duration, Utc};
use common::{
    PaymentMethods, Product, ProductCondition, ProductId, ProductStatus, PurchaseRequest,
    RequestId, RequestStatus, Review, ReviewId, Transaction, TransactionId, User, UserId,
    UserRole,
};

use crate::store::traits::CatalogSnapshot;

/// Seeded entities plus wishlist entries for the preference store
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    pub snapshot: CatalogSnapshot,
    /// (user, product) pairs; some users exist only in the preference store
    pub wishlists: Vec<(UserId, ProductId)>,
}

fn seller(name: &str, email: &str, age: u32, fees_owed: f64) -> User {
    let mut user = User::new(name, email, age, UserRole::Seller);
    user.age_verified = true;
    user.fees_owed = fees_owed;
    user
}

#[allow(clippy::too_many_arguments)]
fn listing(
    seller: &User,
    title: &str,
    description: &str,
    price: f64,
    category: &str,
    condition: ProductCondition,
    shipping_cost: f64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Product {
    let slug = title.to_lowercase().replace(' ', "-");
    Product {
        id: ProductId::new(),
        title: title.to_string(),
        description: description.to_string(),
        price,
        reserve_price: None,
        image_url: Some(format!("https://picsum.photos/seed/{}/400/400", slug)),
        category: category.to_string(),
        condition,
        seller_id: seller.id,
        shipping_cost,
        status: ProductStatus::Available,
        is_nsfw: false,
        reported_nsfw: false,
        documented_damage: vec![],
        created_at,
        expires_at,
    }
}

fn bid(
    product: &Product,
    buyer: &User,
    min_bid: f64,
    max_bid: f64,
    comment: &str,
    created_at: DateTime<Utc>,
) -> PurchaseRequest {
    PurchaseRequest {
        id: RequestId::new(),
        product_id: product.id,
        buyer_id: buyer.id,
        min_bid,
        max_bid,
        comment: comment.to_string(),
        created_at,
        status: RequestStatus::Pending,
    }
}

pub fn demo_catalog(now: DateTime<Utc>) -> DemoCatalog {
    let mut jane = seller("Jane Doe", "jane.d@example.com", 25, 12.50);
    jane.payment_methods = Some(PaymentMethods {
        paypal: Some("jane.d@example.com".to_string()),
    });

    let mut nsfw_seller = seller("NSFW Seller", "nsfw.seller@example.com", 28, 5.00);
    nsfw_seller.is_nsfw = true;

    let john = User::new("John Smith", "john.s@example.com", 16, UserRole::Buyer);

    let mut alice = User::new("Alice Wonder", "alice.w@example.com", 35, UserRole::Buyer);
    alice.age_verified = true;

    let mut jacket = listing(
        &jane,
        "Vintage Denim Jacket",
        "A classic denim jacket from the 90s.",
        75.0,
        "Outerwear",
        ProductCondition::Good,
        10.0,
        now - Duration::days(2),
        now + Duration::days(88),
    );
    jacket.image_url = Some("https://picsum.photos/seed/jacket/400/400".to_string());

    let mut scarf = listing(
        &jane,
        "Silk Scarf",
        "A beautiful 100% silk scarf.",
        25.0,
        "Accessories",
        ProductCondition::LikeNew,
        5.0,
        now - Duration::days(5),
        now + Duration::days(85),
    );
    scarf.status = ProductStatus::Sold;

    let mut boots = listing(
        &jane,
        "Leather Boots",
        "Handmade leather boots, barely worn.",
        150.0,
        "Shoes",
        ProductCondition::LikeNew,
        15.0,
        now - Duration::days(1),
        now + Duration::days(89),
    );
    boots.reserve_price = Some(160.0);

    let mut corset = listing(
        &nsfw_seller,
        "Gothic Corset",
        "A very specific style for mature audiences.",
        90.0,
        "NSFW",
        ProductCondition::NewWithTags,
        8.0,
        now - Duration::days(3),
        now + Duration::days(87),
    );
    corset.is_nsfw = true;
    corset.reported_nsfw = true;

    let necklace = listing(
        &nsfw_seller,
        "Chain Necklace",
        "Goes with the corset.",
        40.0,
        "Accessories",
        ProductCondition::Good,
        5.0,
        now - Duration::hours(12),
        now + Duration::days(5),
    );

    let scarf_sale = Transaction {
        id: TransactionId::new(),
        product_id: scarf.id,
        buyer_id: john.id,
        seller_id: jane.id,
        price: 25.0,
        shipping_cost: 5.0,
        fee: 2.5,
        created_at: now,
        reviewed_by_buyer: true,
        reviewed_by_seller: false,
    };

    jane.reviews.push(Review {
        id: ReviewId::new(),
        author_id: john.id,
        author_name: john.name.clone(),
        target_id: jane.id,
        rating: 5,
        text: "Great seller, fast shipping!".to_string(),
        transaction_id: scarf_sale.id,
        created_at: now,
    });
    alice.reviews.push(Review {
        id: ReviewId::new(),
        author_id: jane.id,
        author_name: jane.name.clone(),
        target_id: alice.id,
        rating: 4,
        text: "Polite buyer, quick communication.".to_string(),
        transaction_id: TransactionId::new(),
        created_at: now,
    });

    let requests = vec![
        bid(
            &boots,
            &john,
            140.0,
            150.0,
            "I love these boots! Hope you consider my offer.",
            now - Duration::minutes(30),
        ),
        bid(
            &boots,
            &alice,
            155.0,
            165.0,
            "Willing to pay a bit extra, I need these for an event next week!",
            now - Duration::minutes(15),
        ),
        bid(&jacket, &alice, 60.0, 75.0, "", now - Duration::hours(1)),
    ];

    let shopper_without_account = UserId::new();
    let wishlists = vec![
        (jane.id, corset.id),
        (jane.id, boots.id),
        (john.id, jacket.id),
        (shopper_without_account, jacket.id),
        (shopper_without_account, necklace.id),
    ];

    DemoCatalog {
        snapshot: CatalogSnapshot::from_parts(
            vec![jane, nsfw_seller, john, alice],
            vec![jacket, scarf, boots, corset, necklace],
            requests,
            vec![scarf_sale],
        ),
        wishlists,
    }
}
