use super::*;

const WHEEL_STEP: u16 = 3;

impl App {
    pub fn on_mouse(&mut self, event: MouseEvent) {
        let target = self.mouse_target_at(event.column, event.row);
        match event.kind {
            MouseEventKind::ScrollUp => self.handle_mouse_scroll(target, false),
            MouseEventKind::ScrollDown => self.handle_mouse_scroll(target, true),
            MouseEventKind::Down(MouseButton::Left) => self.handle_mouse_click(target),
            _ => {}
        }
    }

    fn handle_mouse_scroll(&mut self, target: Option<MouseTarget>, down: bool) {
        match target {
            Some(MouseTarget::ChatPane | MouseTarget::ChatInput) => {
                if down {
                    self.chat.scroll_down(WHEEL_STEP);
                } else {
                    self.chat.scroll_up(WHEEL_STEP);
                }
            }
            Some(_) => {
                if down {
                    self.scroll_card_down(WHEEL_STEP);
                } else {
                    self.scroll_card_up(WHEEL_STEP);
                }
            }
            None => {}
        }
    }

    /// Only the innermost region under the pointer receives the click.
    fn handle_mouse_click(&mut self, target: Option<MouseTarget>) {
        let Some(target) = target else {
            return;
        };
        if self.help_visible {
            self.help_visible = false;
            return;
        }
        match target {
            MouseTarget::SectionTitle(section) => {
                self.focus_card();
                self.toggle_section(section);
            }
            MouseTarget::PrevButton => {
                self.prev_issue();
            }
            MouseTarget::NextButton => {
                self.next_issue();
            }
            MouseTarget::CardPane => self.focus_card(),
            MouseTarget::ChatPane | MouseTarget::ChatInput => self.focus_chat(),
        }
    }

    pub fn clear_mouse_regions(&mut self) {
        self.mouse_regions.clear();
    }

    pub fn register_mouse_region(
        &mut self,
        target: MouseTarget,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        self.mouse_regions.push(MouseRegion {
            target,
            x,
            y,
            width,
            height,
        });
    }

    /// Regions registered later sit on top of earlier ones.
    pub(super) fn mouse_target_at(&self, column: u16, row: u16) -> Option<MouseTarget> {
        self.mouse_regions
            .iter()
            .rev()
            .find(|region| {
                column >= region.x
                    && row >= region.y
                    && column < region.x.saturating_add(region.width)
                    && row < region.y.saturating_add(region.height)
            })
            .map(|region| region.target)
    }
}
