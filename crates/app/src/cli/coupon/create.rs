use clap::{Args, ValueEnum};
use jiff::Timestamp;
use storefront_app::{
    database::{self, Db},
    domain::{
        coupons::{
            CouponsService, PgCouponsService,
            data::NewCoupon,
            records::{CouponStatus, CouponUuid, Discount},
        },
        products::records::{CategoryUuid, ProductUuid},
    },
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiscountKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// Code shoppers enter at checkout
    #[arg(long)]
    code: String,

    /// Unique campaign name
    #[arg(long)]
    campaign_name: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, value_enum)]
    discount_kind: DiscountKind,

    /// Percentage (1-100) or fixed amount in minor units
    #[arg(long)]
    discount_value: u64,

    /// Start of the validity window, e.g. 2026-03-01T00:00:00Z
    #[arg(long)]
    starts_at: Timestamp,

    /// End of the validity window
    #[arg(long)]
    ends_at: Timestamp,

    /// Total redemptions allowed; unlimited when omitted
    #[arg(long)]
    max_uses: Option<u64>,

    #[arg(long, default_value_t = 1)]
    max_uses_per_user: u64,

    #[arg(long)]
    min_order_amount: Option<u64>,

    #[arg(long)]
    max_discount_amount: Option<u64>,

    /// Restrict the coupon to these products
    #[arg(long = "product", value_name = "UUID")]
    products: Vec<Uuid>,

    /// Restrict the coupon to these categories
    #[arg(long = "category", value_name = "UUID")]
    categories: Vec<Uuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCouponsService::new(Db::new(pool));

    let discount = match args.discount_kind {
        DiscountKind::Percentage => Discount::Percentage(args.discount_value),
        DiscountKind::Fixed => Discount::Fixed(args.discount_value),
    };

    let coupon = service
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: args.code,
            campaign_name: args.campaign_name,
            description: args.description,
            discount,
            starts_at: args.starts_at,
            ends_at: args.ends_at,
            max_uses: args.max_uses,
            max_uses_per_user: args.max_uses_per_user,
            min_order_amount: args.min_order_amount,
            max_discount_amount: args.max_discount_amount,
            status: CouponStatus::Active,
            scoped_products: args.products.into_iter().map(ProductUuid::from_uuid).collect(),
            scoped_categories: args
                .categories
                .into_iter()
                .map(CategoryUuid::from_uuid)
                .collect(),
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);
    println!("campaign: {}", coupon.campaign_name);

    Ok(())
}
