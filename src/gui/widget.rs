use crate::fortune::{Fortune, FortuneConfig, FortuneEvent, FortuneItem, Point, Rect};
use crate::gui::{icon, theme, view};
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// A drawing area that owns one [`Fortune`] and animates it on the frame clock.
pub struct FortuneWidget {
    fortune: Rc<RefCell<Fortune>>,
    icons: Rc<RefCell<Vec<Option<Pixbuf>>>>,
    release_velocity: Point,
    area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum FortuneMsg {
    Frame,
    Select(usize),
    Reconfigure {
        items: Vec<FortuneItem>,
        config: FortuneConfig,
    },
    PanBegin(Point),
    PanUpdate(Point),
    Swipe(Point),
    PanEnd,
    Tap(Point),
}

#[derive(Debug, Clone)]
pub enum FortuneOutput {
    Event(FortuneEvent),
    /// New items are live; carries their labels.
    Reconfigured(Vec<String>),
}

#[relm4::component(pub)]
impl SimpleComponent for FortuneWidget {
    type Init = Fortune;
    type Input = FortuneMsg;
    type Output = FortuneOutput;

    view! {
        #[root]
        gtk::DrawingArea {
            set_hexpand: true,
            set_vexpand: true,
            set_content_width: 320,
            set_content_height: 320,
            add_css_class: "fortune-area",

            // added before the drag so the velocity lands before drag-end
            add_controller = gtk::GestureSwipe {
                connect_swipe[sender] => move |_, vx, vy| {
                    sender.input(FortuneMsg::Swipe(Point::new(vx, vy)));
                }
            },

            add_controller = gtk::GestureDrag {
                connect_drag_begin[sender] => move |_, x, y| {
                    sender.input(FortuneMsg::PanBegin(Point::new(x, y)));
                },
                connect_drag_update[sender] => move |gesture, dx, dy| {
                    if let Some((x, y)) = gesture.start_point() {
                        sender.input(FortuneMsg::PanUpdate(Point::new(x + dx, y + dy)));
                    }
                },
                connect_drag_end[sender] => move |_, _, _| {
                    sender.input(FortuneMsg::PanEnd);
                }
            },

            add_controller = gtk::GestureClick {
                connect_released[sender] => move |_, _, x, y| {
                    sender.input(FortuneMsg::Tap(Point::new(x, y)));
                }
            }
        }
    }

    fn init(
        mut fortune: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let icons = Rc::new(RefCell::new(icon::load_all(fortune.items())));
        fortune.mount(Instant::now());
        let fortune = Rc::new(RefCell::new(fortune));

        let model = FortuneWidget {
            fortune: fortune.clone(),
            icons: icons.clone(),
            release_velocity: Point::default(),
            area: root.clone(),
        };

        let widgets = view_output!();

        root.set_draw_func(move |area, cr, width, height| {
            let theme = theme::from_context(&area.style_context());
            let screen_width = area
                .root()
                .map_or(width as f64, |window| window.width() as f64);

            let mut fortune = fortune.borrow_mut();
            fortune.set_viewport(
                Rect::new(0.0, 0.0, width as f64, height as f64),
                screen_width,
            );
            let layout = fortune.layout(&theme);
            if let Err(e) = view::draw(cr, &layout, fortune.items(), &icons.borrow(), &theme) {
                log::error!("Drawing error: {}", e);
            }
        });

        let tick_sender = sender.clone();
        root.add_tick_callback(move |_, _| {
            tick_sender.input(FortuneMsg::Frame);
            glib::ControlFlow::Continue
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        let now = Instant::now();
        let redraw = {
            let mut fortune = self.fortune.borrow_mut();
            match msg {
                FortuneMsg::Frame => fortune.tick(now),
                FortuneMsg::Select(index) => match fortune.select(index, now) {
                    Ok(selection) => {
                        log::debug!("Select {}: {:?}", index, selection);
                        false
                    }
                    Err(e) => {
                        log::warn!("Rejected selection: {}", e);
                        false
                    }
                },
                FortuneMsg::Reconfigure { items, config } => {
                    let icons = icon::load_all(&items);
                    let labels = items.iter().map(|i| i.label().to_string()).collect();
                    match fortune.reconfigure(items, config) {
                        Ok(true) => {
                            *self.icons.borrow_mut() = icons;
                            let _ = sender.output(FortuneOutput::Reconfigured(labels));
                            true
                        }
                        Ok(false) => false,
                        Err(e) => {
                            log::error!("Keeping previous items: {}", e);
                            false
                        }
                    }
                }
                FortuneMsg::PanBegin(point) => {
                    self.release_velocity = Point::default();
                    fortune.pan_begin(point);
                    false
                }
                FortuneMsg::PanUpdate(point) => fortune.pan_update(point) != 0.0,
                FortuneMsg::Swipe(velocity) => {
                    self.release_velocity = velocity;
                    false
                }
                FortuneMsg::PanEnd => {
                    fortune.pan_end(std::mem::take(&mut self.release_velocity));
                    true
                }
                FortuneMsg::Tap(point) => {
                    if !fortune.is_moving() {
                        let theme = theme::from_context(&self.area.style_context());
                        fortune.tap(point, &theme);
                    }
                    false
                }
            }
        };

        let events: Vec<_> = self.fortune.borrow_mut().drain_events().collect();
        for event in events {
            let _ = sender.output(FortuneOutput::Event(event));
        }

        if redraw {
            self.area.queue_draw();
        }
    }
}
