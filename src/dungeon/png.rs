// src/dungeon/png.rs
//! Визуализация подземелья в изображение
//!
//! Рендер только читает готовое подземелье и никак не влияет на генерацию:
//! - Каждая клетка сетки занимает `cell_size × cell_size` пикселей
//! - Комната — квадрат `room_size × room_size` в центре клетки, цвет берётся из её типа
//! - Клетка входа дополнительно подсвечивается серым квадратом на всю клетку
//! - Фон чёрный, холст подгоняется под ограничивающий прямоугольник подземелья
//!
//! ## Пример использования
//! ```rust
//! use dungeongen::{DungeonParams, generate_dungeon};
//! use dungeongen::dungeon::png::DungeonImage;
//! use rand::SeedableRng;
//!
//! let params = DungeonParams::default();
//! let registry = params.build_registry().unwrap();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
//! let dungeon = generate_dungeon(&registry, 30, 10_000, &mut rng).unwrap();
//!
//! let image = DungeonImage::render(&dungeon, &params.render);
//! assert_eq!(image.width % params.render.cell_size, 0);
//! ```

use super::Dungeon;
use crate::config::RenderSettings;
use crate::grid::GridPos;
use image::{ImageBuffer, Rgba};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Цвет подсветки клетки входа
const ENTRANCE_BACKDROP: Rgba<u8> = Rgba([127, 127, 127, 255]);
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Отрисованное подземелье
#[derive(Debug, Clone)]
pub struct DungeonImage {
    /// Ширина в пикселях
    pub width: u32,

    /// Высота в пикселях
    pub height: u32,

    /// Левый верхний угол в координатах сетки (клетка с минимальными `x` и `y`)
    pub origin: GridPos,

    /// Размер клетки в пикселях
    pub cell_size: u32,

    buffer: ImageBuffer<Rgba<u8>, Vec<u8>>,
}

impl DungeonImage {
    /// Рисует подземелье
    ///
    /// # Параметры
    /// * `dungeon` — готовое подземелье
    /// * `settings` — размеры клетки и комнаты (`room_size` обрезается до `cell_size`)
    ///
    /// # Возвращает
    /// Изображение размером `(max.x - min.x + 1) × cell_size` на `(max.y - min.y + 1) × cell_size`.
    #[must_use]
    pub fn render(dungeon: &Dungeon<'_>, settings: &RenderSettings) -> Self {
        let cell_size = settings.cell_size.max(1);
        let room_size = settings.room_size.clamp(1, cell_size);
        let inset = ((cell_size - room_size) / 2) as i32;

        let (min, max) = dungeon.bounds();
        let width = (max.x - min.x + 1) as u32 * cell_size;
        let height = (max.y - min.y + 1) as u32 * cell_size;
        let mut buffer = ImageBuffer::from_pixel(width, height, BACKGROUND);

        for (room, room_type) in dungeon.iter_typed() {
            let px = (room.position.x - min.x) * cell_size as i32;
            let py = (room.position.y - min.y) * cell_size as i32;

            if room.position == GridPos::ORIGIN {
                draw_filled_rect_mut(
                    &mut buffer,
                    Rect::at(px, py).of_size(cell_size, cell_size),
                    ENTRANCE_BACKDROP,
                );
            }

            draw_filled_rect_mut(
                &mut buffer,
                Rect::at(px + inset, py + inset).of_size(room_size, room_size),
                Rgba(room_type.color.0),
            );
        }

        Self {
            width,
            height,
            origin: min,
            cell_size,
            buffer,
        }
    }

    /// Цвет пикселя в центре клетки `position`; `None` за пределами холста
    #[must_use]
    pub fn cell_center(&self, position: GridPos) -> Option<[u8; 4]> {
        let half = (self.cell_size / 2) as i32;
        let px = (position.x - self.origin.x) * self.cell_size as i32 + half;
        let py = (position.y - self.origin.y) * self.cell_size as i32 + half;
        if px < 0 || py < 0 || px as u32 >= self.width || py as u32 >= self.height {
            return None;
        }
        Some(self.buffer.get_pixel(px as u32, py as u32).0)
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.buffer.into_raw()
    }

    /// Сохраняет изображение в PNG-файл
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не удалось записать.
    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.buffer.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DungeonParams;
    use crate::dungeon::generate_dungeon;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rooms_are_drawn_in_their_type_color() {
        let params = DungeonParams::default();
        let registry = params.build_registry().unwrap();
        let dungeon =
            generate_dungeon(&registry, 40, 100_000, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
        let image = DungeonImage::render(&dungeon, &params.render);

        let (min, max) = dungeon.bounds();
        assert_eq!(image.width, (max.x - min.x + 1) as u32 * 30);
        assert_eq!(image.height, (max.y - min.y + 1) as u32 * 30);

        for (room, room_type) in dungeon.iter_typed() {
            assert_eq!(image.cell_center(room.position), Some(room_type.color.0));
        }
    }

    #[test]
    fn empty_cells_stay_black_and_entrance_has_backdrop() {
        let params = DungeonParams::default();
        let registry = params.build_registry().unwrap();
        let dungeon =
            generate_dungeon(&registry, 40, 100_000, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
        let image = DungeonImage::render(&dungeon, &params.render);
        let (min, _) = dungeon.bounds();
        let corner_of_entrance = (
            ((0 - min.x) * 30) as u32,
            ((0 - min.y) * 30) as u32,
        );

        assert_eq!(image.origin, min);
        let width = image.width;
        let raw = image.clone().into_raw();
        let idx = ((corner_of_entrance.1 * width + corner_of_entrance.0) * 4) as usize;
        assert_eq!(&raw[idx..idx + 4], &ENTRANCE_BACKDROP.0);

        let (_, max) = dungeon.bounds();
        let empty = (min.x..=max.x)
            .flat_map(|x| (min.y..=max.y).map(move |y| GridPos::new(x, y)))
            .find(|p| !dungeon.contains(*p));
        if let Some(empty) = empty {
            assert_eq!(image.cell_center(empty), Some(BACKGROUND.0));
        }
    }
}
