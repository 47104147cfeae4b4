//! Static restaurant directory.
//!
//! Each mall lists its outlets as `(name, unit, floor, category)` rows. The
//! lookup helpers never fail: an unknown mall simply has no restaurants.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MALL: &str = "sunway_square";

const LOGO_DIR: &str = "images/logo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestaurantRow {
    pub name: &'static str,
    pub unit: &'static str,
    pub floor: &'static str,
    pub category: &'static str,
}

impl RestaurantRow {
    const fn new(
        name: &'static str,
        unit: &'static str,
        floor: &'static str,
        category: &'static str,
    ) -> Self {
        Self {
            name,
            unit,
            floor,
            category,
        }
    }
}

/// A restaurant as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub unit: String,
    pub floor: String,
    pub category: String,
    pub logo: Option<String>,
}

impl From<&RestaurantRow> for Restaurant {
    fn from(row: &RestaurantRow) -> Self {
        Restaurant {
            name: row.name.to_string(),
            unit: row.unit.to_string(),
            floor: row.floor.to_string(),
            category: row.category.to_string(),
            logo: logo_path(row.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MallInfo {
    pub name: String,
    pub display_name: String,
}

struct Mall {
    id: &'static str,
    name: &'static str,
    display_name: &'static str,
    restaurants: &'static [RestaurantRow],
}

static MALLS: &[Mall] = &[Mall {
    id: "sunway_square",
    name: "Sunway Square",
    display_name: "Sunway Square Mall",
    restaurants: SUNWAY_SQUARE,
}];

static SUNWAY_SQUARE: &[RestaurantRow] = &[
    RestaurantRow::new("103 Coffee", "L1-07", "L1", "Coffee & Cafes"),
    RestaurantRow::new("A'Decade", "L2-22", "L2", "Local & Malaysian"),
    RestaurantRow::new("Armoury Steakhouse", "LG-05", "LG", "Western & International"),
    RestaurantRow::new("BESTORE", "L1-39", "L1", "Snacks & Specialty Store"),
    RestaurantRow::new("Black Canyon", "L1-40", "L1", "Western & International"),
    RestaurantRow::new("Ba Shu Jia Yan", "LG-09 & LG-10", "LG", "Chinese & Taiwanese"),
    RestaurantRow::new("Beutea", "LG1-02", "LG1", "Tea & Beverages"),
    RestaurantRow::new("Bread History", "LG1-25", "LG1", "Bakery & Pastry"),
    RestaurantRow::new("Chagee", "L1-04", "L1", "Tea & Beverages"),
    RestaurantRow::new("Coffee Bean", "L1-31", "L1", "Coffee & Cafes"),
    RestaurantRow::new("Christine's Bakery Cafe", "L1-42", "L1", "Bakery & Pastry"),
    RestaurantRow::new("CHUCHAT", "L1-06", "L1", "Tea & Beverages"),
    RestaurantRow::new("ChaPanda", "L2-01", "L2", "Tea & Beverages"),
    RestaurantRow::new("CU Mart", "L2-28", "L2", "Korean & Convenience"),
    RestaurantRow::new("Come Buy Yakiniku", "LG-01", "LG", "Japanese Cuisine"),
    RestaurantRow::new("Count (Flower Drum)", "LG-06 & LG-07", "LG", "Chinese & Taiwanese"),
    RestaurantRow::new("Chatramue", "LG1-18", "LG1", "Tea & Beverages"),
    RestaurantRow::new("DOZO", "L1-41", "L1", "Japanese Cuisine"),
    RestaurantRow::new("Empire Sushi", "LG1-22", "LG1", "Japanese Cuisine"),
    RestaurantRow::new("Far Coffee", "L2-18A", "L2", "Coffee & Cafes"),
    RestaurantRow::new("Fong Woh Tong", "LG1-23", "LG1", "Chinese & Taiwanese"),
    RestaurantRow::new("Gong Luck Cafe", "L1-30", "L1", "Local & Malaysian"),
    RestaurantRow::new("Gokoku Japanese Bakery", "L1-44", "L1", "Bakery & Pastry"),
    RestaurantRow::new("Gong Cha", "L2-02", "L2", "Tea & Beverages"),
    RestaurantRow::new("Hock Kee Kopitiam", "L1-43", "L1", "Local & Malaysian"),
    RestaurantRow::new("Han Bun Sik", "L2-12", "L2", "Korean Cuisine"),
    RestaurantRow::new("Happy Potato", "L2-04", "L2", "Snacks & Desserts"),
    RestaurantRow::new("I'm Bagel", "L2-29", "L2", "Western & International"),
    RestaurantRow::new("I LIKE & Yogurt In A Can", "L2-03", "L2", "Snacks & Desserts"),
    RestaurantRow::new("JP & CO", "L1-45", "L1", "Western & International"),
    RestaurantRow::new("Kanteen", "L1-08", "L1", "Local & Malaysian"),
    RestaurantRow::new("Kenangan Coffee", "L2-08", "L2", "Coffee & Cafes"),
    RestaurantRow::new("Kedai Kopi Malaya", "LG1-20", "LG1", "Local & Malaysian"),
    RestaurantRow::new("Kha Coffee Roaster", "LG1-14", "LG1", "Coffee & Cafes"),
    RestaurantRow::new("LLAO LLAO", "L1-14", "L1", "Snacks & Desserts"),
    RestaurantRow::new("Luckin", "L1-05", "L1", "Coffee & Cafes"),
    RestaurantRow::new("Manjoe", "L1-17", "L1", "Chinese & Taiwanese"),
    RestaurantRow::new("Mix.Store", "LG-04", "LG", "Snacks & Specialty Store"),
    RestaurantRow::new("Mr. Wu", "LG-11", "LG", "Chinese & Taiwanese"),
    RestaurantRow::new("Missy Sushi", "LG-06", "LG", "Japanese Cuisine"),
    RestaurantRow::new("Nasi Lemak Shop", "LG1-16", "LG1", "Local & Malaysian"),
    RestaurantRow::new("Nine Dragon Char Chan Teng (Kowloon Cafe)", "LG1-13", "LG1", "Chinese & Taiwanese"),
    RestaurantRow::new("Nippon Sushi", "LG1-01", "LG1", "Japanese Cuisine"),
    RestaurantRow::new("Odon Beyond", "L1-03", "L1", "Japanese Cuisine"),
    RestaurantRow::new("One Dish One Taste", "LG1-12B", "LG1", "Chinese & Taiwanese"),
    RestaurantRow::new("Pak Curry", "LG1-26", "LG1", "Local & Malaysian"),
    RestaurantRow::new("Ramen Mob", "L1-12", "L1", "Japanese Cuisine"),
    RestaurantRow::new("Richeese Factory", "LG1-15", "LG1", "Fast Food"),
    RestaurantRow::new("Sweetie", "LG1-24", "LG1", "Snacks & Desserts"),
    RestaurantRow::new("Salad Atelier", "L1-01", "L1", "Western & International"),
    RestaurantRow::new("Super Matcha", "L1-20", "L1", "Tea & Beverages"),
    RestaurantRow::new("Shabuyaki by Nippon Sushi", "LG-12 & LG-13", "LG", "Japanese Cuisine"),
    RestaurantRow::new("Stuff'D", "LG1-27", "LG1", "Western & International"),
    RestaurantRow::new("Subway", "LG1-21", "LG1", "Fast Food"),
    RestaurantRow::new("The Public House", "L1-09", "L1", "Western & International"),
    RestaurantRow::new("Tealive Plus", "L2-30", "L2", "Tea & Beverages"),
    RestaurantRow::new("Tang Gui Fei Tanghulu", "L2-17", "L2", "Snacks & Desserts"),
    RestaurantRow::new("The Walking Hotpot Signature", "L2-23", "L2", "Chinese & Taiwanese"),
    RestaurantRow::new("The Chicken Rice Shop", "LG1-10", "LG1", "Local & Malaysian"),
    RestaurantRow::new("Village Grocer", "LG1-05 to LG1-09", "LG1", "Supermarket"),
    RestaurantRow::new("Yellow Bento", "L2-01", "L2", "Japanese Cuisine"),
    RestaurantRow::new("Yonny", "L1-32", "L1", "Chinese & Taiwanese"),
    RestaurantRow::new("Yama by Hojichaya", "L2-10A", "L2", "Japanese Cuisine"),
    RestaurantRow::new("Yogurt Planet", "LG1-19", "LG1", "Snacks & Desserts"),
    RestaurantRow::new("Zus Coffee", "L1-02", "L1", "Coffee & Cafes"),
    RestaurantRow::new("Zok Noodle House", "L2-24", "L2", "Chinese & Taiwanese"),
];

static LOGOS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "103 Coffee" => "103-coffee.png",
    "A'Decade" => "a'decade.png",
    "Armoury Steakhouse" => "armoury-steakhouse.png",
    "BESTORE" => "bestore.png",
    "Black Canyon" => "black-canyon.png",
    "Ba Shu Jia Yan" => "ba-shu-jia-yan.png",
    "Beutea" => "beutea.png",
    "Bread History" => "bread-history.png",
    "Chagee" => "chagee.png",
    "Coffee Bean" => "coffee-bean.png",
    "Christine's Bakery Cafe" => "christine's-bakery-cafe.png",
    "CHUCHAT" => "chuchat.png",
    "ChaPanda" => "chapanda.png",
    "CU Mart" => "cumart.png",
    "Come Buy Yakiniku" => "come-buy-yakiniku.png",
    "Count (Flower Drum)" => "count(flower-drum).png",
    "Chatramue" => "chatramue.png",
    "DOZO" => "dozo.png",
    "Empire Sushi" => "empire-sushi.png",
    "Far Coffee" => "far-coffee.png",
    "Fong Woh Tong" => "fong-woh-tong.png",
    "Gong Luck Cafe" => "gong-luck-cafe.png",
    "Gokoku Japanese Bakery" => "gokoku-japanese-bakery.png",
    "Gong Cha" => "gong-cha.png",
    "Hock Kee Kopitiam" => "hock-kee-kopitiam.png",
    "Han Bun Sik" => "han-bun-sik.png",
    "Happy Potato" => "happy-potato.png",
    "I'm Bagel" => "i'm-bagel.png",
    "I LIKE & Yogurt In A Can" => "i-like-&-yogurt-in-a-can.png",
    "JP & CO" => "jp-&-co.png",
    "Kanteen" => "kanteen.png",
    "Kenangan Coffee" => "kenangan-coffee.png",
    "Kedai Kopi Malaya" => "kedai-kopi-malaya.png",
    "Kha Coffee Roaster" => "kha-coffee-roaster.png",
    "LLAO LLAO" => "llao-llao.png",
    "Luckin" => "luckin.png",
    "Manjoe" => "manjoe.png",
    "Mix.Store" => "mix.store.png",
    "Mr. Wu" => "mr.wu.png",
    "Missy Sushi" => "missy-sushi.jpeg",
    "Nasi Lemak Shop" => "nasi-lemak-shop.png",
    "Nine Dragon Char Chan Teng (Kowloon Cafe)" => "nine-dragon-char-chan-teng-(kowloon-cafe).png",
    "Nippon Sushi" => "nippon-sushi.png",
    "Odon Beyond" => "odon-beyond.png",
    "One Dish One Taste" => "one-dish-one-taste.png",
    "Pak Curry" => "pak-curry.png",
    "Ramen Mob" => "ramen-mob.png",
    "Richeese Factory" => "richeese-factory.png",
    "Sweetie" => "sweetie.jpg",
    "Salad Atelier" => "salad-atelier.png",
    "Super Matcha" => "super-matcha.png",
    "Shabuyaki by Nippon Sushi" => "shabuyaki-by-nippon-sushi.png",
    "Stuff'D" => "stuff'd.png",
    "Subway" => "subway.png",
    "The Public House" => "the-public-house.png",
    "Tealive Plus" => "tealive-plus.png",
    "Tang Gui Fei Tanghulu" => "tang-gui-fei-tanghulu.png",
    "The Walking Hotpot Signature" => "the-walking-hotpot-signature.png",
    "The Chicken Rice Shop" => "the-chicken-rice-shop.png",
    "Village Grocer" => "village-grocer.png",
    "Yellow Bento" => "yellow-bento.jpeg",
    "Yonny" => "yonny.png",
    "Yama by Hojichaya" => "yama-by-hojichaya.png",
    "Yogurt Planet" => "yogurt-planet.png",
    "Zus Coffee" => "zus-coffee.png",
    "Zok Noodle House" => "zok-noodle-house.png",
};

fn find_mall(mall_id: &str) -> Option<&'static Mall> {
    MALLS.iter().find(|m| m.id == mall_id)
}

pub fn available_malls() -> Vec<&'static str> {
    MALLS.iter().map(|m| m.id).collect()
}

pub fn mall_info(mall_id: &str) -> MallInfo {
    match find_mall(mall_id) {
        Some(mall) => MallInfo {
            name: mall.name.to_string(),
            display_name: mall.display_name.to_string(),
        },
        None => MallInfo {
            name: mall_id.to_string(),
            display_name: mall_id.to_string(),
        },
    }
}

pub fn restaurants_by_mall(mall_id: &str) -> &'static [RestaurantRow] {
    find_mall(mall_id).map(|m| m.restaurants).unwrap_or(&[])
}

pub fn logo_path(restaurant_name: &str) -> Option<String> {
    LOGOS
        .get(restaurant_name)
        .map(|file| format!("{}/{}", LOGO_DIR, file))
}

/// Restaurants of `mall_id` whose category is one of `categories`, in
/// directory order.
pub fn restaurants_by_categories<S: AsRef<str>>(categories: &[S], mall_id: &str) -> Vec<Restaurant> {
    restaurants_by_mall(mall_id)
        .iter()
        .filter(|row| categories.iter().any(|c| c.as_ref() == row.category))
        .map(Restaurant::from)
        .collect()
}

pub fn all_restaurants(mall_id: &str) -> Vec<Restaurant> {
    restaurants_by_mall(mall_id)
        .iter()
        .map(Restaurant::from)
        .collect()
}

/// Distinct categories of a mall, sorted.
pub fn all_categories(mall_id: &str) -> Vec<String> {
    restaurants_by_mall(mall_id)
        .iter()
        .map(|row| row.category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
