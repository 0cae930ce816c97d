//! Default catalog used on first run.

use lumina_luxe_core::{Category, Product, ProductId, Yen};

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    price: u64,
    category: Category,
    description: &'static str,
    image: &'static str,
    color: &'static str,
    rating: f32,
}

const SEED: [SeedProduct; 6] = [
    SeedProduct {
        id: "1",
        name: "ルミナ・オー・ド・パルファム",
        price: 32_000,
        category: Category::Perfume,
        description: "月明かりに照らされた夜の庭園をイメージした、神秘的で洗練された香り。ベルガモットと希少なホワイトウードが調和します。",
        image: "https://images.unsplash.com/photo-1541643600914-78b084683601?auto=format&fit=crop&q=80&w=800",
        color: "ゴールド",
        rating: 4.9,
    },
    SeedProduct {
        id: "2",
        name: "シルク・リバイバル・セラム",
        price: 18_500,
        category: Category::Cosmetics,
        description: "細胞レベルから輝きを。最先端のバイオテクノロジーを用いた、肌の密度を高める高機能美容液。",
        image: "https://images.unsplash.com/photo-1570194065650-d99fb4b8ccb0?auto=format&fit=crop&q=80&w=800",
        color: "クリア",
        rating: 4.8,
    },
    SeedProduct {
        id: "3",
        name: "ネビュラ・ミスト・エッセンス",
        price: 12_000,
        category: Category::Cosmetics,
        description: "極小の分子が肌の深部まで浸透。24時間潤いを逃さない、究極の保湿ミスト。",
        image: "https://images.unsplash.com/photo-1556228720-195a672e8a03?auto=format&fit=crop&q=80&w=800",
        color: "パールホワイト",
        rating: 4.7,
    },
    SeedProduct {
        id: "4",
        name: "オブシディアン・ノワール",
        price: 45_000,
        category: Category::Perfume,
        description: "強さと繊細さを併せ持つ、ウッディでスモーキーな香り。自信に満ち溢れた夜にふさわしい逸品。",
        image: "https://images.unsplash.com/photo-1594035910387-fea47794261f?auto=format&fit=crop&q=80&w=800",
        color: "ブラック",
        rating: 5.0,
    },
    SeedProduct {
        id: "5",
        name: "ベルベット・フィニッシュ・クリーム",
        price: 26_000,
        category: Category::Cosmetics,
        description: "まるでベルベットのような質感へ。肌表面を整え、内側から発光するようなツヤを与えます。",
        image: "https://images.unsplash.com/photo-1596755094514-f87e34085b2c?auto=format&fit=crop&q=80&w=800",
        color: "ピンクゴールド",
        rating: 4.6,
    },
    SeedProduct {
        id: "6",
        name: "エリアル・フローラル・ウォーター",
        price: 28_000,
        category: Category::Perfume,
        description: "摘みたてのジャスミンとローズが、空気に溶け込むような軽やかさで広がります。",
        image: "https://images.unsplash.com/photo-1585232351009-aa87416fca90?auto=format&fit=crop&q=80&w=800",
        color: "ローズ",
        rating: 4.9,
    },
];

/// The built-in product line-up.
#[must_use]
pub fn default_products() -> Vec<Product> {
    SEED.iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_string(),
            price: Yen::new(seed.price),
            category: seed.category,
            description: seed.description.to_string(),
            image: seed.image.to_string(),
            color: seed.color.to_string(),
            rating: seed.rating,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use lumina_luxe_core::{MAX_RATING, validate_catalog};

    use super::*;

    #[test]
    fn test_seed_is_valid() {
        let products = default_products();
        assert_eq!(products.len(), 6);
        assert!(validate_catalog(&products).is_ok());
        assert!(
            products
                .iter()
                .all(|p| (0.0..=MAX_RATING).contains(&p.rating) && !p.image.is_empty())
        );
    }

    #[test]
    fn test_seed_covers_both_categories() {
        let products = default_products();
        for category in Category::ALL {
            assert_eq!(
                products.iter().filter(|p| p.category == category).count(),
                3
            );
        }
    }
}
