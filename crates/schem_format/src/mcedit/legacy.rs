//! Bundled numeric id table for the MCEdit codec.
//!
//! Maps classic `id:meta` pairs to canonical flattened block state strings.
//! The table covers the common pre-flattening id space; the long tail of
//! exotic states is out of scope, and misses degrade to air on both read
//! and write. The reverse table is keyed by the canonical rendering of the
//! parsed state so that writers can look up states from any source format.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::BlockState;

/// Dye color order shared by every 16-color block family.
const COLORS: [&str; 16] = [
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

/// Families where the metadata nibble selects the color.
const COLOR_META_FAMILIES: &[(u8, &str)] = &[
    (35, "wool"),
    (95, "stained_glass"),
    (159, "terracotta"),
    (160, "stained_glass_pane"),
    (171, "carpet"),
    (251, "concrete"),
    (252, "concrete_powder"),
];

/// Families that occupy sixteen consecutive ids, one color each.
const COLOR_ID_FAMILIES: &[(u8, &str)] = &[(219, "shulker_box"), (235, "glazed_terracotta")];

/// Individually mapped id/meta pairs.
static BLOCKS: &[(u8, u8, &str)] = &[
    (0, 0, "minecraft:air"),
    (1, 0, "minecraft:stone"),
    (1, 1, "minecraft:granite"),
    (1, 2, "minecraft:polished_granite"),
    (1, 3, "minecraft:diorite"),
    (1, 4, "minecraft:polished_diorite"),
    (1, 5, "minecraft:andesite"),
    (1, 6, "minecraft:polished_andesite"),
    (2, 0, "minecraft:grass_block[snowy=false]"),
    (3, 0, "minecraft:dirt"),
    (3, 1, "minecraft:coarse_dirt"),
    (3, 2, "minecraft:podzol[snowy=false]"),
    (4, 0, "minecraft:cobblestone"),
    (5, 0, "minecraft:oak_planks"),
    (5, 1, "minecraft:spruce_planks"),
    (5, 2, "minecraft:birch_planks"),
    (5, 3, "minecraft:jungle_planks"),
    (5, 4, "minecraft:acacia_planks"),
    (5, 5, "minecraft:dark_oak_planks"),
    (6, 0, "minecraft:oak_sapling"),
    (6, 1, "minecraft:spruce_sapling"),
    (6, 2, "minecraft:birch_sapling"),
    (6, 3, "minecraft:jungle_sapling"),
    (6, 4, "minecraft:acacia_sapling"),
    (6, 5, "minecraft:dark_oak_sapling"),
    (7, 0, "minecraft:bedrock"),
    (8, 0, "minecraft:water[level=0]"),
    (9, 0, "minecraft:water[level=0]"),
    (10, 0, "minecraft:lava[level=0]"),
    (11, 0, "minecraft:lava[level=0]"),
    (12, 0, "minecraft:sand"),
    (12, 1, "minecraft:red_sand"),
    (13, 0, "minecraft:gravel"),
    (14, 0, "minecraft:gold_ore"),
    (15, 0, "minecraft:iron_ore"),
    (16, 0, "minecraft:coal_ore"),
    (17, 0, "minecraft:oak_log[axis=y]"),
    (17, 1, "minecraft:spruce_log[axis=y]"),
    (17, 2, "minecraft:birch_log[axis=y]"),
    (17, 3, "minecraft:jungle_log[axis=y]"),
    (17, 4, "minecraft:oak_log[axis=x]"),
    (17, 5, "minecraft:spruce_log[axis=x]"),
    (17, 6, "minecraft:birch_log[axis=x]"),
    (17, 7, "minecraft:jungle_log[axis=x]"),
    (17, 8, "minecraft:oak_log[axis=z]"),
    (17, 9, "minecraft:spruce_log[axis=z]"),
    (17, 10, "minecraft:birch_log[axis=z]"),
    (17, 11, "minecraft:jungle_log[axis=z]"),
    (18, 0, "minecraft:oak_leaves"),
    (18, 1, "minecraft:spruce_leaves"),
    (18, 2, "minecraft:birch_leaves"),
    (18, 3, "minecraft:jungle_leaves"),
    (19, 0, "minecraft:sponge"),
    (19, 1, "minecraft:wet_sponge"),
    (20, 0, "minecraft:glass"),
    (21, 0, "minecraft:lapis_ore"),
    (22, 0, "minecraft:lapis_block"),
    (23, 0, "minecraft:dispenser"),
    (24, 0, "minecraft:sandstone"),
    (24, 1, "minecraft:chiseled_sandstone"),
    (24, 2, "minecraft:cut_sandstone"),
    (25, 0, "minecraft:note_block"),
    (27, 0, "minecraft:powered_rail"),
    (28, 0, "minecraft:detector_rail"),
    (29, 0, "minecraft:sticky_piston"),
    (30, 0, "minecraft:cobweb"),
    (31, 1, "minecraft:grass"),
    (31, 2, "minecraft:fern"),
    (32, 0, "minecraft:dead_bush"),
    (33, 0, "minecraft:piston"),
    (37, 0, "minecraft:dandelion"),
    (38, 0, "minecraft:poppy"),
    (38, 1, "minecraft:blue_orchid"),
    (38, 2, "minecraft:allium"),
    (38, 3, "minecraft:azure_bluet"),
    (38, 4, "minecraft:red_tulip"),
    (38, 5, "minecraft:orange_tulip"),
    (38, 6, "minecraft:white_tulip"),
    (38, 7, "minecraft:pink_tulip"),
    (38, 8, "minecraft:oxeye_daisy"),
    (39, 0, "minecraft:brown_mushroom"),
    (40, 0, "minecraft:red_mushroom"),
    (41, 0, "minecraft:gold_block"),
    (42, 0, "minecraft:iron_block"),
    (43, 0, "minecraft:smooth_stone_slab[type=double]"),
    (44, 0, "minecraft:smooth_stone_slab[type=bottom]"),
    (44, 1, "minecraft:sandstone_slab[type=bottom]"),
    (44, 3, "minecraft:cobblestone_slab[type=bottom]"),
    (44, 4, "minecraft:brick_slab[type=bottom]"),
    (44, 5, "minecraft:stone_brick_slab[type=bottom]"),
    (44, 8, "minecraft:smooth_stone_slab[type=top]"),
    (45, 0, "minecraft:bricks"),
    (46, 0, "minecraft:tnt"),
    (47, 0, "minecraft:bookshelf"),
    (48, 0, "minecraft:mossy_cobblestone"),
    (49, 0, "minecraft:obsidian"),
    (50, 0, "minecraft:torch"),
    (50, 1, "minecraft:wall_torch[facing=east]"),
    (50, 2, "minecraft:wall_torch[facing=west]"),
    (50, 3, "minecraft:wall_torch[facing=south]"),
    (50, 4, "minecraft:wall_torch[facing=north]"),
    (50, 5, "minecraft:torch"),
    (51, 0, "minecraft:fire"),
    (52, 0, "minecraft:spawner"),
    (53, 0, "minecraft:oak_stairs[facing=east,half=bottom]"),
    (53, 1, "minecraft:oak_stairs[facing=west,half=bottom]"),
    (53, 2, "minecraft:oak_stairs[facing=south,half=bottom]"),
    (53, 3, "minecraft:oak_stairs[facing=north,half=bottom]"),
    (54, 0, "minecraft:chest"),
    (54, 2, "minecraft:chest[facing=north]"),
    (54, 3, "minecraft:chest[facing=south]"),
    (54, 4, "minecraft:chest[facing=west]"),
    (54, 5, "minecraft:chest[facing=east]"),
    (55, 0, "minecraft:redstone_wire"),
    (56, 0, "minecraft:diamond_ore"),
    (57, 0, "minecraft:diamond_block"),
    (58, 0, "minecraft:crafting_table"),
    (59, 0, "minecraft:wheat[age=0]"),
    (59, 7, "minecraft:wheat[age=7]"),
    (60, 0, "minecraft:farmland"),
    (61, 0, "minecraft:furnace"),
    (62, 0, "minecraft:furnace[lit=true]"),
    (63, 0, "minecraft:sign"),
    (64, 0, "minecraft:oak_door"),
    (65, 0, "minecraft:ladder"),
    (65, 2, "minecraft:ladder[facing=north]"),
    (65, 3, "minecraft:ladder[facing=south]"),
    (65, 4, "minecraft:ladder[facing=west]"),
    (65, 5, "minecraft:ladder[facing=east]"),
    (66, 0, "minecraft:rail"),
    (67, 0, "minecraft:cobblestone_stairs[facing=east,half=bottom]"),
    (67, 1, "minecraft:cobblestone_stairs[facing=west,half=bottom]"),
    (67, 2, "minecraft:cobblestone_stairs[facing=south,half=bottom]"),
    (67, 3, "minecraft:cobblestone_stairs[facing=north,half=bottom]"),
    (68, 0, "minecraft:wall_sign"),
    (69, 0, "minecraft:lever"),
    (70, 0, "minecraft:stone_pressure_plate"),
    (71, 0, "minecraft:iron_door"),
    (72, 0, "minecraft:oak_pressure_plate"),
    (73, 0, "minecraft:redstone_ore"),
    (74, 0, "minecraft:redstone_ore[lit=true]"),
    (75, 0, "minecraft:redstone_torch[lit=false]"),
    (76, 0, "minecraft:redstone_torch"),
    (77, 0, "minecraft:stone_button"),
    (78, 0, "minecraft:snow[layers=1]"),
    (78, 7, "minecraft:snow[layers=8]"),
    (79, 0, "minecraft:ice"),
    (80, 0, "minecraft:snow_block"),
    (81, 0, "minecraft:cactus"),
    (82, 0, "minecraft:clay"),
    (83, 0, "minecraft:sugar_cane"),
    (84, 0, "minecraft:jukebox"),
    (85, 0, "minecraft:oak_fence"),
    (86, 0, "minecraft:carved_pumpkin[facing=south]"),
    (86, 1, "minecraft:carved_pumpkin[facing=west]"),
    (86, 2, "minecraft:carved_pumpkin[facing=north]"),
    (86, 3, "minecraft:carved_pumpkin[facing=east]"),
    (87, 0, "minecraft:netherrack"),
    (88, 0, "minecraft:soul_sand"),
    (89, 0, "minecraft:glowstone"),
    (90, 0, "minecraft:nether_portal"),
    (91, 0, "minecraft:jack_o_lantern"),
    (92, 0, "minecraft:cake"),
    (93, 0, "minecraft:repeater"),
    (96, 0, "minecraft:oak_trapdoor"),
    (97, 0, "minecraft:infested_stone"),
    (97, 1, "minecraft:infested_cobblestone"),
    (97, 2, "minecraft:infested_stone_bricks"),
    (98, 0, "minecraft:stone_bricks"),
    (98, 1, "minecraft:mossy_stone_bricks"),
    (98, 2, "minecraft:cracked_stone_bricks"),
    (98, 3, "minecraft:chiseled_stone_bricks"),
    (99, 0, "minecraft:brown_mushroom_block"),
    (100, 0, "minecraft:red_mushroom_block"),
    (101, 0, "minecraft:iron_bars"),
    (102, 0, "minecraft:glass_pane"),
    (103, 0, "minecraft:melon"),
    (106, 0, "minecraft:vine"),
    (107, 0, "minecraft:oak_fence_gate"),
    (108, 0, "minecraft:brick_stairs[facing=east,half=bottom]"),
    (109, 0, "minecraft:stone_brick_stairs[facing=east,half=bottom]"),
    (110, 0, "minecraft:mycelium"),
    (111, 0, "minecraft:lily_pad"),
    (112, 0, "minecraft:nether_bricks"),
    (113, 0, "minecraft:nether_brick_fence"),
    (114, 0, "minecraft:nether_brick_stairs[facing=east,half=bottom]"),
    (115, 0, "minecraft:nether_wart"),
    (116, 0, "minecraft:enchanting_table"),
    (117, 0, "minecraft:brewing_stand"),
    (118, 0, "minecraft:cauldron"),
    (120, 0, "minecraft:end_portal_frame"),
    (121, 0, "minecraft:end_stone"),
    (122, 0, "minecraft:dragon_egg"),
    (123, 0, "minecraft:redstone_lamp"),
    (124, 0, "minecraft:redstone_lamp[lit=true]"),
    (126, 0, "minecraft:oak_slab[type=bottom]"),
    (126, 1, "minecraft:spruce_slab[type=bottom]"),
    (126, 2, "minecraft:birch_slab[type=bottom]"),
    (126, 3, "minecraft:jungle_slab[type=bottom]"),
    (126, 4, "minecraft:acacia_slab[type=bottom]"),
    (126, 5, "minecraft:dark_oak_slab[type=bottom]"),
    (128, 0, "minecraft:sandstone_stairs[facing=east,half=bottom]"),
    (129, 0, "minecraft:emerald_ore"),
    (130, 0, "minecraft:ender_chest"),
    (131, 0, "minecraft:tripwire_hook"),
    (133, 0, "minecraft:emerald_block"),
    (134, 0, "minecraft:spruce_stairs[facing=east,half=bottom]"),
    (135, 0, "minecraft:birch_stairs[facing=east,half=bottom]"),
    (136, 0, "minecraft:jungle_stairs[facing=east,half=bottom]"),
    (137, 0, "minecraft:command_block"),
    (138, 0, "minecraft:beacon"),
    (139, 0, "minecraft:cobblestone_wall"),
    (139, 1, "minecraft:mossy_cobblestone_wall"),
    (140, 0, "minecraft:flower_pot"),
    (141, 0, "minecraft:carrots"),
    (142, 0, "minecraft:potatoes"),
    (143, 0, "minecraft:oak_button"),
    (145, 0, "minecraft:anvil"),
    (145, 1, "minecraft:chipped_anvil"),
    (145, 2, "minecraft:damaged_anvil"),
    (146, 0, "minecraft:trapped_chest"),
    (147, 0, "minecraft:light_weighted_pressure_plate"),
    (148, 0, "minecraft:heavy_weighted_pressure_plate"),
    (149, 0, "minecraft:comparator"),
    (151, 0, "minecraft:daylight_detector"),
    (152, 0, "minecraft:redstone_block"),
    (153, 0, "minecraft:nether_quartz_ore"),
    (154, 0, "minecraft:hopper"),
    (155, 0, "minecraft:quartz_block"),
    (155, 1, "minecraft:chiseled_quartz_block"),
    (155, 2, "minecraft:quartz_pillar[axis=y]"),
    (156, 0, "minecraft:quartz_stairs[facing=east,half=bottom]"),
    (157, 0, "minecraft:activator_rail"),
    (158, 0, "minecraft:dropper"),
    (161, 0, "minecraft:acacia_leaves"),
    (161, 1, "minecraft:dark_oak_leaves"),
    (162, 0, "minecraft:acacia_log[axis=y]"),
    (162, 1, "minecraft:dark_oak_log[axis=y]"),
    (163, 0, "minecraft:acacia_stairs[facing=east,half=bottom]"),
    (164, 0, "minecraft:dark_oak_stairs[facing=east,half=bottom]"),
    (165, 0, "minecraft:slime_block"),
    (166, 0, "minecraft:barrier"),
    (167, 0, "minecraft:iron_trapdoor"),
    (168, 0, "minecraft:prismarine"),
    (168, 1, "minecraft:prismarine_bricks"),
    (168, 2, "minecraft:dark_prismarine"),
    (169, 0, "minecraft:sea_lantern"),
    (170, 0, "minecraft:hay_block[axis=y]"),
    (172, 0, "minecraft:terracotta"),
    (173, 0, "minecraft:coal_block"),
    (174, 0, "minecraft:packed_ice"),
    (175, 0, "minecraft:sunflower[half=lower]"),
    (175, 1, "minecraft:lilac[half=lower]"),
    (175, 2, "minecraft:tall_grass[half=lower]"),
    (175, 3, "minecraft:large_fern[half=lower]"),
    (175, 4, "minecraft:rose_bush[half=lower]"),
    (175, 5, "minecraft:peony[half=lower]"),
    (179, 0, "minecraft:red_sandstone"),
    (179, 1, "minecraft:chiseled_red_sandstone"),
    (179, 2, "minecraft:cut_red_sandstone"),
    (180, 0, "minecraft:red_sandstone_stairs[facing=east,half=bottom]"),
    (182, 0, "minecraft:red_sandstone_slab[type=bottom]"),
    (183, 0, "minecraft:spruce_fence_gate"),
    (184, 0, "minecraft:birch_fence_gate"),
    (185, 0, "minecraft:jungle_fence_gate"),
    (186, 0, "minecraft:dark_oak_fence_gate"),
    (187, 0, "minecraft:acacia_fence_gate"),
    (188, 0, "minecraft:spruce_fence"),
    (189, 0, "minecraft:birch_fence"),
    (190, 0, "minecraft:jungle_fence"),
    (191, 0, "minecraft:dark_oak_fence"),
    (192, 0, "minecraft:acacia_fence"),
    (193, 0, "minecraft:spruce_door"),
    (194, 0, "minecraft:birch_door"),
    (195, 0, "minecraft:jungle_door"),
    (196, 0, "minecraft:acacia_door"),
    (197, 0, "minecraft:dark_oak_door"),
    (198, 0, "minecraft:end_rod"),
    (199, 0, "minecraft:chorus_plant"),
    (200, 0, "minecraft:chorus_flower"),
    (201, 0, "minecraft:purpur_block"),
    (202, 0, "minecraft:purpur_pillar[axis=y]"),
    (203, 0, "minecraft:purpur_stairs[facing=east,half=bottom]"),
    (205, 0, "minecraft:purpur_slab[type=bottom]"),
    (206, 0, "minecraft:end_stone_bricks"),
    (207, 0, "minecraft:beetroots"),
    (208, 0, "minecraft:grass_path"),
    (210, 0, "minecraft:repeating_command_block"),
    (211, 0, "minecraft:chain_command_block"),
    (212, 0, "minecraft:frosted_ice"),
    (213, 0, "minecraft:magma_block"),
    (214, 0, "minecraft:nether_wart_block"),
    (215, 0, "minecraft:red_nether_bricks"),
    (216, 0, "minecraft:bone_block[axis=y]"),
    (217, 0, "minecraft:structure_void"),
    (218, 0, "minecraft:observer"),
    (255, 0, "minecraft:structure_block"),
];

/// All table entries in declaration order. Color families expand here so
/// the flat table stays readable.
fn table_entries() -> Vec<((u8, u8), String)> {
    let mut entries = Vec::with_capacity(BLOCKS.len() + 9 * COLORS.len());
    for &(id, meta, state) in BLOCKS {
        entries.push(((id, meta), state.to_owned()));
    }
    for &(id, family) in COLOR_META_FAMILIES {
        for (meta, color) in COLORS.iter().enumerate() {
            entries.push(((id, meta as u8), format!("minecraft:{color}_{family}")));
        }
    }
    for &(base, family) in COLOR_ID_FAMILIES {
        for (offset, color) in COLORS.iter().enumerate() {
            entries.push(((base + offset as u8, 0), format!("minecraft:{color}_{family}")));
        }
    }
    entries
}

static FORWARD: LazyLock<HashMap<(u8, u8), String>> =
    LazyLock::new(|| table_entries().into_iter().collect());

/// Keyed by the canonical rendering of each table entry; on collisions the
/// first declaration wins.
static REVERSE: LazyLock<HashMap<String, (u8, u8)>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for ((id, meta), state) in table_entries() {
        map.entry(BlockState::parse(&state).canonical())
            .or_insert((id, meta));
    }
    map
});

/// The canonical block state string for a legacy id/meta pair.
///
/// Unknown metadata falls back to `meta == 0` for the same id; a miss on
/// that too yields `None` and the cell reads as air.
pub fn legacy_block(id: u8, meta: u8) -> Option<&'static str> {
    FORWARD
        .get(&(id, meta))
        .or_else(|| FORWARD.get(&(id, 0)))
        .map(String::as_str)
}

/// The legacy id/meta pair for a canonical block state string, if the state
/// is representable.
pub fn legacy_ids(canonical: &str) -> Option<(u8, u8)> {
    REVERSE.get(canonical).copied()
}
