//! Word lists for variant-label cleanup.
//!
//! Entries are lowercase. Cyrillic product-type aliases are stems and match
//! any inflected ending; Latin aliases match whole words (with an optional
//! plural `s`/`es`); CJK aliases match as substrings.

/// Canonical product types and the aliases that map onto them.
///
/// The canonical name is what ends up in a price line.
pub(crate) const KNOWN_TYPES: &[(&str, &[&str])] = &[
    ("майка", &["майк", "топ", "top", "tank", "camisole", "背心", "吊带"]),
    ("футболка", &["футболк", "t-shirt", "tshirt", "tee", "t恤", "短袖"]),
    ("лонгслив", &["лонгслив", "long sleeve", "longsleeve", "长袖"]),
    ("шорты", &["шорт", "shorts", "短裤"]),
    ("джинсы", &["джинс", "jeans", "牛仔裤"]),
    ("брюки", &["брюк", "штан", "trousers", "pants", "长裤", "裤子", "裤"]),
    ("рубашка", &["рубашк", "shirt", "衬衫"]),
    ("блузка", &["блуз", "blouse", "雪纺衫"]),
    ("куртка", &["куртк", "jacket", "外套", "夹克"]),
    ("пальто", &["пальто", "coat", "大衣"]),
    ("платье", &["плать", "dress", "连衣裙"]),
    ("юбка", &["юбк", "skirt", "半身裙", "裙"]),
    ("костюм", &["костюм", "комплект", "suit", "set", "套装"]),
    ("свитер", &["свитер", "sweater", "jumper", "毛衣", "针织衫"]),
    ("худи", &["худи", "толстовк", "hoodie", "sweatshirt", "卫衣"]),
    ("кардиган", &["кардиган", "cardigan", "开衫"]),
    ("жилет", &["жилет", "vest", "waistcoat", "马甲"]),
    ("комбинезон", &["комбинезон", "jumpsuit", "overalls", "连体"]),
    ("купальник", &["купальник", "swimsuit", "bikini", "泳衣"]),
    ("пижама", &["пижам", "pajamas", "pyjamas", "睡衣"]),
    ("носки", &["носк", "socks", "袜"]),
];

/// Standalone Latin color words and shade modifiers.
pub(crate) const LATIN_COLORS: &[&str] = &[
    "white", "black", "red", "blue", "green", "yellow", "pink", "grey", "gray", "beige",
    "brown", "purple", "orange", "khaki", "navy", "apricot", "cream", "ivory", "silver",
    "gold", "burgundy", "violet", "coffee", "camel", "multicolor", "rose", "mint", "lilac",
    "dark", "light", "pale", "bright", "deep",
];

/// Cyrillic color stems; matched with an optional adjective ending.
pub(crate) const CYRILLIC_COLOR_STEMS: &[&str] = &[
    "бел", "черн", "чёрн", "красн", "син", "зелен", "зелён", "желт", "жёлт", "розов", "сер",
    "голуб", "фиолетов", "бежев", "коричнев", "оранжев", "молочн", "бордов", "серебрист",
    "золот", "кремов", "абрикосов", "мятн", "лилов", "пудров", "малинов", "изумрудн",
    "темн", "тёмн", "светл", "ярк", "бледн", "хаки", "темно", "светло",
];

/// Generic words that carry no product-type information.
pub(crate) const STOPWORDS: &[&str] = &[
    "цвет", "цвета", "размер", "размеры", "color", "colour", "size", "new", "новинка",
    "новый", "новая", "модель", "style", "стиль", "женский", "женская", "женские",
    "мужской", "мужская", "мужские", "детский", "детская", "unisex", "унисекс",
    "классический", "классическая", "basic", "базовый", "базовая", "однотонный",
    "однотонная", "solid", "plain", "товар", "item", "the", "and", "with", "for", "для",
    "分类", "颜色", "尺码", "款式", "新款", "默认", "套餐", "款",
];

/// Words typical of boilerplate SKUs (shipping fees, links, gifts) rather
/// than products. A label containing two or more is suspicious.
pub(crate) const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "доставка", "доставки", "ссылка", "подарок", "скидка", "доплата", "консультация",
    "уточняйте", "менеджер", "образец", "shipping", "freight", "link", "gift", "deposit",
    "sample", "contact", "customer", "service", "邮费", "运费", "链接", "客服", "补差价",
    "赠品", "专拍", "定金",
];
