// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::Regex;

/// 物品和方块的语言键
const ALLOW_PATTERN: &str = r"(?:item|block)\.minecraft\.[a-z_0-9]+$";

/// 装饰性、占位或变体条目，这些条目在 wiki 上没有独立页面
const DENY_PATTERNS: &[&str] = &[
    r"(?:item|block)\.minecraft\.[a-z_]+_candle_cake",
    r"(?:item|block)\.minecraft\.[a-z_]*air",
    r"(?:item|block)\.minecraft\.attached_[a-z_]+_stem",
    r"(?:item|block)\.minecraft\.[a-z_]+_stem",
    r"(?:item|block)\.minecraft\.[a-z_]+_command_block",
    r"(?:item|block)\.minecraft\.[a-z_]+_spawn_egg",
    r"(?:item|block)\.minecraft\.[a-z_]+_wall_fan",
    r"(?:item|block)\.minecraft\.[a-z_]+_wall_[a-z_]+",
    r"(?:item|block)\.minecraft\.[a-z_]+_wall_hanging_sign",
    r"(?:item|block)\.minecraft\.[a-z_]+_bundle",
    r"(?:item|block)\.minecraft\.[a-z_]+_pottery_shard",
    r"(?:item|block)\.minecraft\.[a-z_]+_harness",
    r"(?:item|block)\.minecraft\.potted_[a-z_]+",
    r"(?:item|block)\.minecraft\.[a-z_]+_plant",
    r"(?:item|block)\.minecraft\.[a-z_]+_crop",
    r"block\.minecraft\.set_spawn",
    r"item\.minecraft\.potion",
    r"item\.minecraft\.scute",
    r"block\.minecraft\.nether_portal",
    r"block\.minecraft\.player_head",
    r"block\.minecraft\.barrier",
    r"block\.minecraft\.test_[a-z_]+",
    r"block\.minecraft\.moving_piston",
    r"block\.minecraft\.light$",
    r"item\.minecraft\.lodestone_compass",
    r"block\.minecraft\.[a-z]+_cauldron",
    r"block\.minecraft\.bubble_column",
];

/// 语言文件中的显示名称与 wiki 页面标题不一致的条目
const NAME_OVERRIDES: &[(&str, &str)] = &[
    ("item.minecraft.music_disc_blocks", "Blocks Music Disc"),
    ("item.minecraft.music_disc_cat", "Cat Music Disc"),
    ("item.minecraft.music_disc_chirp", "Chirp Music Disc"),
    ("item.minecraft.music_disc_creator", "Creator Music Disc"),
    ("item.minecraft.music_disc_creator_music_box", "Creator Music Box Disc"),
    ("item.minecraft.music_disc_far", "Far Music Disc"),
    ("item.minecraft.music_disc_mall", "Mall Music Disc"),
    ("item.minecraft.music_disc_mellohi", "Mellohi Music Disc"),
    ("item.minecraft.music_disc_otherside", "Otherside Music Disc"),
    ("item.minecraft.music_disc_pigstep", "Pigstep Music Disc"),
    ("item.minecraft.music_disc_precipice", "Precipice Music Disc"),
    ("item.minecraft.music_disc_relic", "Relic Music Disc"),
    ("item.minecraft.music_disc_stal", "Stal Music Disc"),
    ("item.minecraft.music_disc_strad", "Strad Music Disc"),
    ("item.minecraft.music_disc_tears", "Tears Music Disc"),
    ("item.minecraft.music_disc_wait", "Wait Music Disc"),
    ("item.minecraft.music_disc_ward", "Ward Music Disc"),
    ("item.minecraft.music_disc_5", "5 Music Disc"),
    ("item.minecraft.music_disc_11", "11 Music Disc"),
    ("item.minecraft.music_disc_13", "13 Music Disc"),
    ("item.minecraft.creeper_banner_pattern", "Creeper Banner Pattern"),
    ("item.minecraft.flow_banner_pattern", "Flow Banner Pattern"),
    ("item.minecraft.flower_banner_pattern", "Flower Banner Pattern"),
    ("item.minecraft.globe_banner_pattern", "Globe Banner Pattern"),
    ("item.minecraft.guster_banner_pattern", "Guster Banner Pattern"),
    ("item.minecraft.mojang_banner_pattern", "Thing Banner Pattern"),
    ("item.minecraft.piglin_banner_pattern", "Piglin Banner Pattern"),
    ("item.minecraft.skull_banner_pattern", "Skull Banner Pattern"),
];

/// 条目目录过滤器
///
/// 允许模式和排除模式都只锚定开头；名称覆盖最后应用，且只作用于通过过滤的键。
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    allow: Regex,
    deny: Vec<Regex>,
    overrides: Vec<(String, String)>,
}

impl CatalogFilter {
    pub fn new<S: AsRef<str>>(
        allow: &str,
        deny: &[S],
        overrides: Vec<(String, String)>,
    ) -> Result<Self, regex::Error> {
        let allow = anchored(allow)?;
        let deny = deny
            .iter()
            .map(|p| anchored(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            allow,
            deny,
            overrides,
        })
    }

    /// Minecraft 语言文件的默认规则
    pub fn minecraft() -> Result<Self, regex::Error> {
        let overrides = NAME_OVERRIDES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(ALLOW_PATTERN, DENY_PATTERNS, overrides)
    }

    pub fn accepts(&self, key: &str) -> bool {
        self.allow.is_match(key) && !self.deny.iter().any(|re| re.is_match(key))
    }

    /// 过滤 `key -> 显示名称` 条目并应用名称覆盖
    ///
    /// # 返回值
    ///
    /// 保持输入顺序的条目列表
    pub fn apply<'a, I>(&self, entries: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        entries
            .into_iter()
            .filter(|(key, _)| self.accepts(key))
            .map(|(key, name)| {
                let name = self
                    .overrides
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or(name);
                (key.to_string(), name.to_string())
            })
            .collect()
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}
